use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::modules::catalog_api::{BanknoteDraft, BanknoteListFilter, CountryDraft, Grade};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::validation::{validate_flag_reference, validate_grade, validate_price};

/// Request DTO for registering a country
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCountryDto {
    #[validate(length(min = 2, max = 100, message = "Country name must be 2-100 characters"))]
    pub pais: String,

    /// Two-letter code ("co") or flag image URL
    #[validate(custom(function = "validate_flag_reference"))]
    pub bandera: String,
}

impl CreateCountryDto {
    pub fn into_draft(self) -> CountryDraft {
        let bandera = self.bandera.trim();
        CountryDraft {
            pais: self.pais.trim().to_string(),
            bandera: if bandera.len() == 2 {
                bandera.to_lowercase()
            } else {
                bandera.to_string()
            },
        }
    }
}

/// Request DTO for creating or replacing a banknote
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BanknoteDto {
    #[validate(range(min = 1, message = "A country must be selected"))]
    pub pais: i64,

    #[validate(length(min = 1, max = 100, message = "Denomination is required"))]
    pub denominacion: String,

    /// Decimal price as text, e.g. "50000" or "1250.50"
    #[validate(custom(function = "validate_price"))]
    pub precio: String,

    pub banco_emisor: Option<String>,
    pub medidas: Option<String>,
    pub descripcion_general: Option<String>,
    pub descripcion_anverso: Option<String>,
    pub descripcion_reverso: Option<String>,
    pub url_anverso: Option<String>,
    pub url_reverso: Option<String>,
    pub pick: Option<String>,

    /// One of Regular, Aceptable, Bueno, Muy bueno, Excelente
    #[validate(custom(function = "validate_grade"))]
    pub estado: Option<String>,

    #[serde(default)]
    pub vendido: bool,
    #[serde(default)]
    pub destacado: bool,
    #[serde(default)]
    pub caracteristicas_ids: Vec<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BanknoteDto {
    pub fn into_draft(self) -> BanknoteDraft {
        BanknoteDraft {
            pais: self.pais,
            denominacion: self.denominacion.trim().to_string(),
            precio: self.precio.trim().to_string(),
            banco_emisor: non_blank(self.banco_emisor),
            medidas: non_blank(self.medidas),
            descripcion_general: non_blank(self.descripcion_general),
            descripcion_anverso: non_blank(self.descripcion_anverso),
            descripcion_reverso: non_blank(self.descripcion_reverso),
            url_anverso: non_blank(self.url_anverso),
            url_reverso: non_blank(self.url_reverso),
            pick: non_blank(self.pick),
            estado: self.estado.as_deref().and_then(Grade::parse),
            vendido: self.vendido,
            destacado: self.destacado,
            caracteristicas_ids: self.caracteristicas_ids,
        }
    }
}

/// Filters of the admin banknote listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct BanknoteListQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Country id
    pub pais: Option<i64>,
    pub denominacion: Option<String>,
    pub anio_desde: Option<i32>,
    pub anio_hasta: Option<i32>,
    pub precio_desde: Option<String>,
    pub precio_hasta: Option<String>,
    pub vendido: Option<bool>,
    pub destacado: Option<bool>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl BanknoteListQuery {
    pub fn into_filter(self) -> BanknoteListFilter {
        BanknoteListFilter {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
            pais: self.pais,
            denominacion: non_blank(self.denominacion),
            anio_desde: self.anio_desde,
            anio_hasta: self.anio_hasta,
            precio_desde: non_blank(self.precio_desde),
            precio_hasta: non_blank(self.precio_hasta),
            vendido: self.vendido,
            destacado: self.destacado,
        }
    }
}

/// Body of the sold/featured toggles
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleDto {
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LabelCountDto {
    pub nombre: String,
    pub total: usize,
}

/// Inventory figures computed from the current catalog snapshot
#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryStatisticsDto {
    pub total_billetes: usize,
    pub total_vendidos: usize,
    pub total_disponibles: usize,
    pub total_destacados: usize,
    /// Sum of all prices, as a decimal string
    pub valor_total_inventario: String,
    /// Sum of prices of unsold banknotes
    pub valor_inventario_disponible: String,
    pub por_pais: Vec<LabelCountDto>,
    pub por_estado: Vec<LabelCountDto>,
    pub caracteristicas_populares: Vec<LabelCountDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn banknote_json() -> serde_json::Value {
        json!({
            "pais": 1,
            "denominacion": " 50 Pesos ",
            "precio": "50000",
            "banco_emisor": "  ",
            "estado": "muy bueno",
            "caracteristicas_ids": [3]
        })
    }

    #[test]
    fn test_banknote_dto_into_draft() {
        let dto: BanknoteDto = serde_json::from_value(banknote_json()).unwrap();
        assert!(dto.validate().is_err(), "grade labels are case-sensitive on input");

        let mut value = banknote_json();
        value["estado"] = json!("Muy bueno");
        let dto: BanknoteDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().is_ok());

        let draft = dto.into_draft();
        assert_eq!(draft.denominacion, "50 Pesos");
        assert_eq!(draft.banco_emisor, None);
        assert_eq!(draft.estado, Some(Grade::MuyBueno));
        assert!(!draft.vendido);
    }

    #[test]
    fn test_banknote_dto_rejects_bad_price_and_country() {
        let mut value = banknote_json();
        value["estado"] = json!(null);
        value["precio"] = json!("-5");
        value["pais"] = json!(0);
        let dto: BanknoteDto = serde_json::from_value(value).unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("precio"));
        assert!(fields.contains_key("pais"));
    }

    #[test]
    fn test_create_country_dto() {
        let dto = CreateCountryDto {
            pais: "C".to_string(),
            bandera: "col".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);

        let draft = CreateCountryDto {
            pais: " Colombia ".to_string(),
            bandera: "CO".to_string(),
        }
        .into_draft();
        assert_eq!(draft.pais, "Colombia");
        assert_eq!(draft.bandera, "co");
    }

    #[test]
    fn test_list_query_clamps_paging() {
        let query: BanknoteListQuery =
            serde_json::from_value(json!({"page": 0, "page_size": 500, "denominacion": ""}))
                .unwrap();
        let filter = query.into_filter();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, MAX_PAGE_SIZE);
        assert_eq!(filter.denominacion, None);
    }
}

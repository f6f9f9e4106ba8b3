use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Country as served by `paises/paises-select`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Country {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub pais: String,
    /// Flag reference: either a two-letter code or an image URL
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub bandera: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continente: Option<String>,
}

/// Country reference embedded in banknote records
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CountryRef {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub pais: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub bandera: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continente: Option<String>,
}

/// Feature tag ("característica") attached to banknotes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureTag {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub color: String,
}

/// Condition grade of a banknote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    Regular,
    Aceptable,
    Bueno,
    #[serde(rename = "Muy bueno")]
    MuyBueno,
    Excelente,
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::Regular,
        Grade::Aceptable,
        Grade::Bueno,
        Grade::MuyBueno,
        Grade::Excelente,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Regular => "Regular",
            Grade::Aceptable => "Aceptable",
            Grade::Bueno => "Bueno",
            Grade::MuyBueno => "Muy bueno",
            Grade::Excelente => "Excelente",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(label))
    }
}

/// Banknote record as returned by the catalog API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Banknote {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub denominacion: String,
    /// Decimal price as text; numbers are accepted and kept verbatim
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub precio: Option<String>,
    #[serde(default)]
    pub banco_emisor: Option<String>,
    #[serde(default)]
    pub medidas: Option<String>,
    #[serde(default, alias = "descripcion")]
    pub descripcion_general: Option<String>,
    #[serde(default)]
    pub descripcion_anverso: Option<String>,
    #[serde(default)]
    pub descripcion_reverso: Option<String>,
    #[serde(default)]
    pub url_anverso: Option<String>,
    #[serde(default)]
    pub url_reverso: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub pick: Option<String>,
    #[serde(default, deserialize_with = "lenient::grade")]
    pub estado: Option<Grade>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub vendido: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub destacado: bool,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub fecha_actualizacion: Option<DateTime<Utc>>,
    /// Owning country id
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub pais: Option<i64>,
    #[serde(default)]
    pub pais_rel: Option<CountryRef>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub caracteristicas: Vec<FeatureTag>,
}

// =============================================================================
// WRITE MODELS
// =============================================================================

/// Body of `POST paises/`
#[derive(Debug, Clone, Serialize)]
pub struct CountryDraft {
    pub pais: String,
    pub bandera: String,
}

/// Body of `POST billetes/` and `PUT billetes/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct BanknoteDraft {
    pub pais: i64,
    pub denominacion: String,
    pub precio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banco_emisor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medidas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion_general: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion_anverso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion_reverso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_anverso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_reverso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<Grade>,
    pub vendido: bool,
    pub destacado: bool,
    pub caracteristicas_ids: Vec<i64>,
}

/// Body of `PATCH billetes/{id}`; only the flags that change are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct BanknoteFlagsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendido: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destacado: Option<bool>,
}

/// Query of the paginated admin listing `GET billetes/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct BanknoteListFilter {
    pub page: i64,
    pub page_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pais: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denominacion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anio_desde: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anio_hasta: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_desde: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_hasta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendido: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destacado: Option<bool>,
}

/// Deserializers that accept the loosely typed values the catalog API emits.
mod lenient {
    use super::*;
    use serde::de::Error;
    use serde_json::Value;

    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    fn value_to_id(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        value_to_id(&value).ok_or_else(|| D::Error::custom(format!("invalid id: {}", value)))
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value_to_id(&value))
    }

    /// Strings stay as-is, numbers are rendered back to text, anything else is `None`.
    pub fn opt_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
            Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1"),
            _ => false,
        })
    }

    /// Unknown grade labels are dropped instead of failing the whole record.
    pub fn grade<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Grade>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().and_then(Grade::parse))
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().and_then(parse_timestamp))
    }

    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_banknote_accepts_loose_types() {
        let banknote: Banknote = serde_json::from_value(json!({
            "id": "12",
            "denominacion": "50 Pesos",
            "precio": 50000,
            "pick": 401,
            "estado": "Muy bueno",
            "vendido": 0,
            "destacado": "true",
            "fecha_actualizacion": "2024-05-01T10:20:30.123456",
            "pais": "3",
            "pais_rel": {"id": 3, "pais": "Colombia", "bandera": "co"},
            "caracteristicas": null
        }))
        .unwrap();

        assert_eq!(banknote.id, 12);
        assert_eq!(banknote.precio.as_deref(), Some("50000"));
        assert_eq!(banknote.pick.as_deref(), Some("401"));
        assert_eq!(banknote.estado, Some(Grade::MuyBueno));
        assert!(!banknote.vendido);
        assert!(banknote.destacado);
        assert!(banknote.fecha_actualizacion.is_some());
        assert_eq!(banknote.pais, Some(3));
        assert!(banknote.caracteristicas.is_empty());
    }

    #[test]
    fn test_banknote_minimal_record() {
        let banknote: Banknote =
            serde_json::from_value(json!({"id": 1, "precio": null, "estado": "Impecable"}))
                .unwrap();

        assert_eq!(banknote.denominacion, "");
        assert_eq!(banknote.precio, None);
        assert_eq!(banknote.estado, None);
        assert!(banknote.pais_rel.is_none());
        assert!(banknote.fecha_actualizacion.is_none());
    }

    #[test]
    fn test_banknote_without_id_is_rejected() {
        assert!(serde_json::from_value::<Banknote>(json!({"denominacion": "x"})).is_err());
        assert!(serde_json::from_value::<Banknote>(json!({"id": "abc"})).is_err());
    }

    #[test]
    fn test_description_alias() {
        let banknote: Banknote =
            serde_json::from_value(json!({"id": 1, "descripcion": "Serie A"})).unwrap();
        assert_eq!(banknote.descripcion_general.as_deref(), Some("Serie A"));
    }

    #[test]
    fn test_grade_serializes_with_labels() {
        assert_eq!(
            serde_json::to_value(Grade::MuyBueno).unwrap(),
            json!("Muy bueno")
        );
        assert_eq!(Grade::parse("excelente"), Some(Grade::Excelente));
        assert_eq!(Grade::parse(""), None);
    }

    #[test]
    fn test_flags_patch_only_sends_changed_fields() {
        let patch = BanknoteFlagsPatch {
            vendido: Some(true),
            destacado: None,
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"vendido": true}));
    }
}

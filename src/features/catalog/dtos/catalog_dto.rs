use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::catalog::taxonomy::{
    Continent, ContinentGroup, CountryGroup, EnrichedBanknote, PriceRange, Stage,
};
use crate::modules::catalog_api::{Banknote, Country};

/// Country with its classification and number of banknotes in the catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CountrySummaryDto {
    #[serde(flatten)]
    pub country: Country,
    #[serde(rename = "continente_asignado")]
    pub continent: Continent,
    pub codigo_pais: String,
    pub total_billetes: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CountryListQuery {
    /// Only countries of this continent (accents and case are ignored)
    pub continente: Option<String>,
}

/// Explorer navigation replayed from query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ExploreQuery {
    /// Selected continent, e.g. "América"
    pub continente: Option<String>,
    /// Selected country; requires `continente`
    pub pais: Option<String>,
    /// Case-insensitive substring of the denomination
    pub texto: Option<String>,
    /// Lower price handle
    pub precio_min: Option<i64>,
    /// Upper price handle
    pub precio_max: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterStateDto {
    pub texto: String,
    pub rango_precios: PriceRange,
    /// Slider defaults for a fresh session
    pub rango_inicial: PriceRange,
    pub filtros_activos: bool,
    pub slider_izquierda: f64,
    pub slider_ancho: f64,
}

/// One explorer screen: the current stage and the data it shows
#[derive(Debug, Serialize, ToSchema)]
pub struct ExplorerViewDto {
    pub navegacion: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continentes: Option<Vec<ContinentGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paises: Option<Vec<CountryGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billetes: Option<Vec<EnrichedBanknote>>,
    /// Banknotes of the selected country before filtering
    pub total_pais: usize,
    pub filtros: FilterStateDto,
}

/// Banknote detail with image links ready to embed
#[derive(Debug, Serialize, ToSchema)]
pub struct BanknoteDetailDto {
    #[serde(flatten)]
    pub banknote: Banknote,
    #[serde(rename = "continente")]
    pub continent: Continent,
    pub codigo_pais: String,
    pub precio_numerico: f64,
    pub bandera_url: Option<String>,
}

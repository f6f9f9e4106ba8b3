use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::classifier::{classify, Continent};
use crate::modules::catalog_api::Banknote;
use crate::shared::constants::UNKNOWN_COUNTRY_NAME;

/// Banknote decorated with its continent, country code and parsed price
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrichedBanknote {
    #[serde(flatten)]
    pub banknote: Banknote,
    #[serde(rename = "pais_nombre")]
    pub country_name: String,
    #[serde(rename = "continente")]
    pub continent: Continent,
    #[serde(rename = "codigo_pais")]
    pub country_code: String,
    #[serde(rename = "precio_numerico")]
    pub numeric_price: f64,
}

/// Parses a price as sent by the API. Empty, missing or non-numeric text is 0.
pub fn parse_price(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0.0;
    };

    Decimal::from_str(raw)
        .ok()
        .and_then(|d| d.to_f64())
        .or_else(|| raw.parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

pub fn enrich(banknote: Banknote) -> EnrichedBanknote {
    let (name, flag) = match &banknote.pais_rel {
        Some(country) if !country.pais.trim().is_empty() => {
            (country.pais.trim().to_string(), country.bandera.as_str())
        }
        Some(country) => (UNKNOWN_COUNTRY_NAME.to_string(), country.bandera.as_str()),
        None => (UNKNOWN_COUNTRY_NAME.to_string(), ""),
    };

    let classification = classify(&name, flag);
    let numeric_price = parse_price(banknote.precio.as_deref());

    EnrichedBanknote {
        country_name: name,
        continent: classification.continent,
        country_code: classification.code,
        numeric_price,
        banknote,
    }
}

pub fn enrich_all(banknotes: Vec<Banknote>) -> Vec<EnrichedBanknote> {
    banknotes.into_iter().map(enrich).collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::banknote;
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(Some("50000")), 50000.0);
        assert_eq!(parse_price(Some(" 1250.50 ")), 1250.5);
        assert_eq!(parse_price(Some("1e3")), 1000.0);
        assert_eq!(parse_price(Some("")), 0.0);
        assert_eq!(parse_price(Some("abc")), 0.0);
        assert_eq!(parse_price(Some("NaN")), 0.0);
        assert_eq!(parse_price(None), 0.0);
    }

    #[test]
    fn test_enrich_known_country() {
        let enriched = enrich(banknote(1, "50 Pesos", "Colombia", "", "50000"));
        assert_eq!(enriched.continent, Continent::America);
        assert_eq!(enriched.country_code, "co");
        assert_eq!(enriched.country_name, "Colombia");
        assert_eq!(enriched.numeric_price, 50000.0);
    }

    #[test]
    fn test_enrich_unknown_country_code_never_fails() {
        let enriched = enrich(banknote(1, "10 Florines", "Atlantis", "qq", "abc"));
        assert_eq!(enriched.continent, Continent::Otros);
        assert_eq!(enriched.country_code, "qq");
        assert_eq!(enriched.numeric_price, 0.0);
    }

    #[test]
    fn test_enrich_missing_country_reference() {
        let mut raw = banknote(1, "1 Dólar", "", "", "10");
        raw.pais_rel = None;
        let enriched = enrich(raw);
        assert_eq!(enriched.country_name, UNKNOWN_COUNTRY_NAME);
        assert_eq!(enriched.continent, Continent::Otros);
        assert_eq!(enriched.country_code, "xx");
    }

    #[test]
    fn test_enriched_serialization_keeps_banknote_fields() {
        let enriched = enrich(banknote(9, "5 Euros", "España", "es", "0"));
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["denominacion"], "5 Euros");
        assert_eq!(json["continente"], "Europa");
        assert_eq!(json["codigo_pais"], "es");
        assert_eq!(json["precio_numerico"], 0.0);
    }
}

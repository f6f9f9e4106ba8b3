//! Continent → country → banknote navigation
//!
//! The explorer owns one navigation session over an immutable list of enriched
//! banknotes. Selecting a country captures that country's base list once; every
//! filter change recomputes the visible list from that base.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::aggregation::{group_by_continent, group_by_country, ContinentGroup, CountryGroup};
use super::classifier::{fold, Continent};
use super::enrichment::EnrichedBanknote;
use super::filter::apply_filters;
use super::price_range::PriceRange;
use crate::core::error::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExplorerError {
    #[error("A continent must be selected before choosing a country")]
    NoContinentSelected,

    #[error("Country '{0}' has no banknotes in the selected continent")]
    UnknownCountry(String),
}

impl From<ExplorerError> for AppError {
    fn from(err: ExplorerError) -> Self {
        match err {
            ExplorerError::NoContinentSelected => AppError::BadRequest(err.to_string()),
            ExplorerError::UnknownCountry(_) => AppError::NotFound(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "vista", rename_all = "snake_case")]
pub enum Stage {
    #[serde(rename = "continentes")]
    Continents,
    #[serde(rename = "paises")]
    Countries {
        #[serde(rename = "continente")]
        continent: Continent,
    },
    #[serde(rename = "billetes")]
    Banknotes {
        #[serde(rename = "continente")]
        continent: Continent,
        #[serde(rename = "pais")]
        country: String,
    },
}

pub struct Explorer {
    catalog: Arc<[EnrichedBanknote]>,
    continents: Vec<ContinentGroup>,
    stage: Stage,
    countries: Vec<CountryGroup>,
    base: Vec<EnrichedBanknote>,
    visible: Vec<EnrichedBanknote>,
    text: String,
    price: PriceRange,
}

impl Explorer {
    pub fn new(catalog: Arc<[EnrichedBanknote]>) -> Self {
        let continents = group_by_continent(&catalog);
        let price = PriceRange::from_prices(catalog.iter().map(|b| b.numeric_price));

        Self {
            catalog,
            continents,
            stage: Stage::Continents,
            countries: Vec::new(),
            base: Vec::new(),
            visible: Vec::new(),
            text: String::new(),
            price,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn continents(&self) -> &[ContinentGroup] {
        &self.continents
    }

    pub fn countries(&self) -> &[CountryGroup] {
        &self.countries
    }

    pub fn visible(&self) -> &[EnrichedBanknote] {
        &self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn price(&self) -> &PriceRange {
        &self.price
    }

    pub fn selected_continent(&self) -> Option<Continent> {
        match &self.stage {
            Stage::Continents => None,
            Stage::Countries { continent } | Stage::Banknotes { continent, .. } => {
                Some(*continent)
            }
        }
    }

    pub fn selected_country(&self) -> Option<&str> {
        match &self.stage {
            Stage::Banknotes { country, .. } => Some(country),
            _ => None,
        }
    }

    pub fn select_continent(&mut self, continent: Continent) {
        if matches!(self.stage, Stage::Banknotes { .. }) {
            self.reset_country_state();
        }
        self.countries = group_by_country(&self.catalog, continent);
        self.stage = Stage::Countries { continent };
    }

    /// Captures the country's base list and shows it through the current filters.
    ///
    /// Country names compare without regard to case or accents.
    pub fn select_country(&mut self, country: &str) -> Result<(), ExplorerError> {
        let continent = self
            .selected_continent()
            .ok_or(ExplorerError::NoContinentSelected)?;

        let wanted = fold(country);
        let name = self
            .countries
            .iter()
            .find(|g| fold(&g.country) == wanted)
            .map(|g| g.country.clone())
            .ok_or_else(|| ExplorerError::UnknownCountry(country.trim().to_string()))?;

        self.base = self
            .catalog
            .iter()
            .filter(|b| b.country_name == name && b.continent == continent)
            .cloned()
            .collect();
        self.stage = Stage::Banknotes {
            continent,
            country: name,
        };
        self.apply();
        Ok(())
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.apply();
    }

    pub fn move_price_min(&mut self, value: i64) {
        self.price.move_min(value);
        self.apply();
    }

    pub fn move_price_max(&mut self, value: i64) {
        self.price.move_max(value);
        self.apply();
    }

    pub fn clear_filters(&mut self) {
        self.text.clear();
        self.price.reset();
        self.apply();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.text.trim().is_empty() || self.price.is_narrowed()
    }

    /// Banknotes of the selected country across the whole catalog, ignoring filters.
    pub fn total_in_country(&self) -> usize {
        self.selected_country()
            .map(|country| {
                self.catalog
                    .iter()
                    .filter(|b| b.country_name == country)
                    .count()
            })
            .unwrap_or(0)
    }

    /// One level up: banknotes → countries, countries → continents.
    pub fn back(&mut self) {
        match &self.stage {
            Stage::Banknotes { continent, .. } => {
                let continent = *continent;
                self.reset_country_state();
                self.stage = Stage::Countries { continent };
            }
            Stage::Countries { .. } => {
                self.countries.clear();
                self.stage = Stage::Continents;
            }
            Stage::Continents => {}
        }
    }

    pub fn go_to_continents(&mut self) {
        self.reset_country_state();
        self.countries.clear();
        self.stage = Stage::Continents;
    }

    /// Returns to the country list of the selected continent, if any.
    pub fn go_to_countries(&mut self) {
        if let Some(continent) = self.selected_continent() {
            self.reset_country_state();
            self.stage = Stage::Countries { continent };
        }
    }

    fn reset_country_state(&mut self) {
        self.text.clear();
        self.price.reset();
        self.base.clear();
        self.visible.clear();
    }

    fn apply(&mut self) {
        if matches!(self.stage, Stage::Banknotes { .. }) {
            self.visible = apply_filters(&self.base, &self.text, &self.price);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::enrichment::{enrich_all, fixtures::banknote};
    use super::super::price_range::PriceInterval;
    use super::*;

    fn catalog() -> Arc<[EnrichedBanknote]> {
        enrich_all(vec![
            banknote(1, "50 Pesos", "Colombia", "co", "50000"),
            banknote(2, "100 Pesos", "Colombia", "co", "100000"),
            banknote(3, "1000 Pesos", "Colombia", "co", "0"),
            banknote(4, "20 Pesos", "México", "mx", "30000"),
            banknote(5, "5 Pesetas", "España", "es", "0"),
        ])
        .into()
    }

    fn denominations(explorer: &Explorer) -> Vec<&str> {
        explorer
            .visible()
            .iter()
            .map(|b| b.banknote.denominacion.as_str())
            .collect()
    }

    #[test]
    fn test_starts_at_continents_with_default_selection() {
        let explorer = Explorer::new(catalog());
        assert_eq!(explorer.stage(), &Stage::Continents);
        assert_eq!(explorer.continents().len(), 2);
        assert_eq!(explorer.continents()[0].continent, Continent::America);
        assert_eq!(
            explorer.price().selection,
            PriceInterval { min: 48_000, max: 162_000 }
        );
        assert!(explorer.visible().is_empty());
    }

    #[test]
    fn test_absurd_upstream_price_keeps_handles_apart() {
        let catalog: Arc<[EnrichedBanknote]> = enrich_all(vec![
            banknote(1, "50 Pesos", "Colombia", "co", "50000"),
            banknote(2, "Error de carga", "Colombia", "co", "5000000000000000000"),
        ])
        .into();

        let mut explorer = Explorer::new(catalog);
        let selection = explorer.price().selection;
        assert!(selection.min < selection.max);

        explorer.select_continent(Continent::America);
        explorer.select_country("Colombia").unwrap();
        explorer.clear_filters();
        assert_eq!(explorer.visible().len(), 2);
    }

    #[test]
    fn test_country_requires_continent() {
        let mut explorer = Explorer::new(catalog());
        assert_eq!(
            explorer.select_country("Colombia"),
            Err(ExplorerError::NoContinentSelected)
        );
    }

    #[test]
    fn test_country_must_belong_to_continent() {
        let mut explorer = Explorer::new(catalog());
        explorer.select_continent(Continent::Europa);
        assert_eq!(
            explorer.select_country("Colombia"),
            Err(ExplorerError::UnknownCountry("Colombia".to_string()))
        );
    }

    #[test]
    fn test_select_country_uses_current_filters() {
        let mut explorer = Explorer::new(catalog());
        explorer.select_continent(Continent::America);
        assert_eq!(explorer.countries()[0].country, "Colombia");

        explorer.select_country("colombia").unwrap();
        assert_eq!(explorer.selected_country(), Some("Colombia"));
        // Initial 48_000..162_000 selection is narrower than the bounds
        assert_eq!(denominations(&explorer), vec!["50 Pesos", "100 Pesos"]);
        assert_eq!(explorer.total_in_country(), 3);
    }

    #[test]
    fn test_filters_never_compound() {
        let mut explorer = Explorer::new(catalog());
        explorer.select_continent(Continent::America);
        explorer.select_country("Colombia").unwrap();
        explorer.clear_filters();
        assert_eq!(explorer.visible().len(), 3);

        explorer.set_text("1000");
        assert_eq!(denominations(&explorer), vec!["1000 Pesos"]);

        // Widening again starts from the base, not from the previous result
        explorer.set_text("pesos");
        assert_eq!(explorer.visible().len(), 3);

        explorer.move_price_max(60_000);
        assert_eq!(denominations(&explorer), vec!["50 Pesos"]);
        explorer.move_price_max(200_000);
        assert_eq!(explorer.visible().len(), 3);
    }

    #[test]
    fn test_back_twice_returns_to_initial_view_with_reset_filters() {
        let mut explorer = Explorer::new(catalog());
        explorer.select_continent(Continent::America);
        explorer.select_country("Colombia").unwrap();
        explorer.set_text("50");
        explorer.move_price_min(20_000);
        assert!(explorer.has_active_filters());

        explorer.back();
        assert_eq!(
            explorer.stage(),
            &Stage::Countries {
                continent: Continent::America
            }
        );
        assert_eq!(explorer.text(), "");
        assert_eq!(explorer.price().selection, explorer.price().bounds);
        assert!(!explorer.has_active_filters());
        assert!(explorer.visible().is_empty());

        explorer.back();
        assert_eq!(explorer.stage(), &Stage::Continents);
        assert!(explorer.countries().is_empty());

        explorer.back();
        assert_eq!(explorer.stage(), &Stage::Continents);
    }

    #[test]
    fn test_direct_navigation() {
        let mut explorer = Explorer::new(catalog());
        explorer.go_to_countries();
        assert_eq!(explorer.stage(), &Stage::Continents);

        explorer.select_continent(Continent::America);
        explorer.select_country("México").unwrap();
        explorer.set_text("20");

        explorer.go_to_countries();
        assert_eq!(
            explorer.stage(),
            &Stage::Countries {
                continent: Continent::America
            }
        );
        assert_eq!(explorer.text(), "");

        explorer.select_country("Mexico").unwrap();
        explorer.go_to_continents();
        assert_eq!(explorer.stage(), &Stage::Continents);
        assert!(explorer.visible().is_empty());
        assert_eq!(explorer.total_in_country(), 0);
    }

    #[test]
    fn test_switching_continent_from_banknotes_resets_country() {
        let mut explorer = Explorer::new(catalog());
        explorer.select_continent(Continent::America);
        explorer.select_country("Colombia").unwrap();
        explorer.set_text("50");

        explorer.select_continent(Continent::Europa);
        assert_eq!(explorer.selected_country(), None);
        assert_eq!(explorer.text(), "");
        assert_eq!(explorer.countries()[0].country, "España");
    }

    #[test]
    fn test_stage_serialization() {
        let stage = Stage::Banknotes {
            continent: Continent::America,
            country: "Colombia".to_string(),
        };
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(json["vista"], "billetes");
        assert_eq!(json["continente"], "América");
        assert_eq!(json["pais"], "Colombia");
    }
}

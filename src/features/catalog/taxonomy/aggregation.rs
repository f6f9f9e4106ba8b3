//! Grouping of enriched banknotes by continent and by country
//!
//! Both levels follow the same rule: every banknote counts toward the total, only
//! positive prices feed the average, and groups are sorted by count descending with
//! ties kept in first-seen order.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use super::classifier::Continent;
use super::enrichment::EnrichedBanknote;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContinentGroup {
    #[serde(rename = "nombre")]
    pub continent: Continent,
    #[serde(rename = "paises")]
    pub countries: Vec<String>,
    #[serde(rename = "total_billetes")]
    pub banknote_count: usize,
    #[serde(rename = "precio_promedio")]
    pub average_price: f64,
    #[serde(rename = "icono")]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CountryGroup {
    #[serde(rename = "nombre")]
    pub country: String,
    #[serde(rename = "codigo_pais")]
    pub country_code: String,
    #[serde(rename = "total_billetes")]
    pub banknote_count: usize,
    #[serde(rename = "precio_promedio")]
    pub average_price: f64,
    #[serde(rename = "billetes")]
    pub banknotes: Vec<EnrichedBanknote>,
}

/// Running count plus the positive prices seen so far
#[derive(Debug, Default)]
struct PriceTally {
    count: usize,
    positive_sum: f64,
    positive_count: usize,
}

impl PriceTally {
    fn record(&mut self, price: f64) {
        self.count += 1;
        if price > 0.0 {
            self.positive_sum += price;
            self.positive_count += 1;
        }
    }

    fn average(&self) -> f64 {
        if self.positive_count == 0 {
            0.0
        } else {
            self.positive_sum / self.positive_count as f64
        }
    }
}

pub fn group_by_continent(banknotes: &[EnrichedBanknote]) -> Vec<ContinentGroup> {
    struct Acc {
        continent: Continent,
        countries: Vec<String>,
        seen: HashSet<String>,
        tally: PriceTally,
    }

    let mut order: Vec<Acc> = Vec::new();
    let mut index: HashMap<Continent, usize> = HashMap::new();

    for banknote in banknotes {
        let slot = *index.entry(banknote.continent).or_insert_with(|| {
            order.push(Acc {
                continent: banknote.continent,
                countries: Vec::new(),
                seen: HashSet::new(),
                tally: PriceTally::default(),
            });
            order.len() - 1
        });

        let acc = &mut order[slot];
        if acc.seen.insert(banknote.country_name.clone()) {
            acc.countries.push(banknote.country_name.clone());
        }
        acc.tally.record(banknote.numeric_price);
    }

    let mut groups: Vec<ContinentGroup> = order
        .into_iter()
        .map(|acc| ContinentGroup {
            continent: acc.continent,
            countries: acc.countries,
            banknote_count: acc.tally.count,
            average_price: acc.tally.average(),
            icon: acc.continent.icon().to_string(),
        })
        .collect();

    // sort_by is stable, so ties keep first-seen order
    groups.sort_by(|a, b| b.banknote_count.cmp(&a.banknote_count));
    groups
}

pub fn group_by_country(banknotes: &[EnrichedBanknote], continent: Continent) -> Vec<CountryGroup> {
    let mut order: Vec<(CountryGroup, PriceTally)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for banknote in banknotes.iter().filter(|b| b.continent == continent) {
        let slot = *index
            .entry(banknote.country_name.as_str())
            .or_insert_with(|| {
                order.push((
                    CountryGroup {
                        country: banknote.country_name.clone(),
                        country_code: banknote.country_code.clone(),
                        banknote_count: 0,
                        average_price: 0.0,
                        banknotes: Vec::new(),
                    },
                    PriceTally::default(),
                ));
                order.len() - 1
            });

        let (group, tally) = &mut order[slot];
        group.banknotes.push(banknote.clone());
        tally.record(banknote.numeric_price);
    }

    let mut groups: Vec<CountryGroup> = order
        .into_iter()
        .map(|(mut group, tally)| {
            group.banknote_count = tally.count;
            group.average_price = tally.average();
            group
        })
        .collect();

    groups.sort_by(|a, b| b.banknote_count.cmp(&a.banknote_count));
    groups
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::catalog::dtos::{
    BanknoteDetailDto, CountrySummaryDto, ExploreQuery, ExplorerViewDto, FilterStateDto,
};
use crate::features::catalog::taxonomy::enrichment::enrich;
use crate::features::catalog::taxonomy::{
    classify, enrich_all, group_by_continent, group_by_country, Continent, ContinentGroup,
    CountryGroup, EnrichedBanknote, Explorer, ExplorerError, PriceRange, Stage,
};
use crate::modules::catalog_api::{CatalogSource, Country};
use crate::shared::image_url::{normalize_image_url, normalize_optional};

/// Immutable, enriched view of the whole catalog
pub struct CatalogSnapshot {
    pub countries: Vec<Country>,
    pub banknotes: Arc<[EnrichedBanknote]>,
    pub continents: Vec<ContinentGroup>,
    /// Slider bounds and initial selection over every observed price
    pub price_range: PriceRange,
}

impl CatalogSnapshot {
    pub fn build(countries: Vec<Country>, banknotes: Vec<EnrichedBanknote>) -> Self {
        let continents = group_by_continent(&banknotes);
        let price_range = PriceRange::from_prices(banknotes.iter().map(|b| b.numeric_price));

        Self {
            countries,
            banknotes: banknotes.into(),
            continents,
            price_range,
        }
    }
}

struct CachedSnapshot {
    snapshot: Arc<CatalogSnapshot>,
    fetched_at: Instant,
}

/// Serves the public catalog views from a TTL-bound snapshot
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    cache: RwLock<Option<CachedSnapshot>>,
    ttl: Duration,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
            ttl,
        }
    }

    /// Returns the cached snapshot, rebuilding it on a miss or after the TTL.
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.fetched_at.elapsed() < self.ttl {
                    return Ok(cached.snapshot.clone());
                }
            }
        }

        self.rebuild().await
    }

    async fn rebuild(&self) -> Result<Arc<CatalogSnapshot>> {
        let started = Instant::now();
        let (countries, banknotes) =
            tokio::try_join!(self.source.fetch_countries(), self.source.fetch_banknotes())?;

        let snapshot = Arc::new(CatalogSnapshot::build(countries, enrich_all(banknotes)));

        tracing::info!(
            "Catalog snapshot rebuilt: {} countries, {} banknotes, {} continents in {:?}",
            snapshot.countries.len(),
            snapshot.banknotes.len(),
            snapshot.continents.len(),
            started.elapsed()
        );

        let mut cache = self.cache.write().await;
        *cache = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            fetched_at: Instant::now(),
        });

        Ok(snapshot)
    }

    /// Drops the cached snapshot; the next read fetches fresh data.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        if cache.take().is_some() {
            tracing::debug!("Catalog snapshot invalidated");
        }
    }

    pub async fn list_countries(&self, continent: Option<&str>) -> Result<Vec<CountrySummaryDto>> {
        let continent = continent.map(parse_continent).transpose()?;
        let snapshot = self.snapshot().await?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for banknote in snapshot.banknotes.iter() {
            *counts.entry(banknote.country_name.as_str()).or_default() += 1;
        }

        let summaries = snapshot
            .countries
            .iter()
            .map(|country| {
                let classification = classify(&country.pais, &country.bandera);
                CountrySummaryDto {
                    total_billetes: counts.get(country.pais.trim()).copied().unwrap_or(0),
                    continent: classification.continent,
                    codigo_pais: classification.code,
                    country: country.clone(),
                }
            })
            .filter(|summary| continent.map_or(true, |c| summary.continent == c))
            .collect();

        Ok(summaries)
    }

    pub async fn continents(&self) -> Result<Vec<ContinentGroup>> {
        Ok(self.snapshot().await?.continents.clone())
    }

    pub async fn countries_in(&self, continent: &str) -> Result<Vec<CountryGroup>> {
        let continent = parse_continent(continent)?;
        let snapshot = self.snapshot().await?;
        Ok(group_by_country(&snapshot.banknotes, continent))
    }

    pub async fn price_range(&self) -> Result<PriceRange> {
        Ok(self.snapshot().await?.price_range)
    }

    /// Featured banknotes still for sale, most recently updated first
    pub async fn featured(&self) -> Result<Vec<EnrichedBanknote>> {
        let snapshot = self.snapshot().await?;
        let mut featured: Vec<EnrichedBanknote> = snapshot
            .banknotes
            .iter()
            .filter(|b| b.banknote.destacado && !b.banknote.vendido)
            .cloned()
            .collect();

        featured.sort_by(|a, b| {
            b.banknote
                .fecha_actualizacion
                .cmp(&a.banknote.fecha_actualizacion)
        });
        Ok(featured)
    }

    /// Replays a navigation session described by query parameters.
    ///
    /// Missing price handles mean the full bounds, so a plain country request shows
    /// every banknote of that country.
    pub async fn explore(&self, query: &ExploreQuery) -> Result<ExplorerViewDto> {
        let continent = query.continente.as_deref().map(parse_continent).transpose()?;
        let country = query
            .pais
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        if let (Some(min), Some(max)) = (query.precio_min, query.precio_max) {
            if min >= max {
                return Err(AppError::BadRequest(
                    "precio_min must be lower than precio_max".to_string(),
                ));
            }
        }

        let snapshot = self.snapshot().await?;
        let mut explorer = Explorer::new(snapshot.banknotes.clone());
        let initial_range = *explorer.price();

        if let Some(continent) = continent {
            explorer.select_continent(continent);
        }

        explorer.clear_filters();
        if let Some(min) = query.precio_min {
            explorer.move_price_min(min);
        }
        if let Some(max) = query.precio_max {
            explorer.move_price_max(max);
        }
        if let Some(text) = query.texto.as_deref() {
            explorer.set_text(text);
        }

        if let Some(country) = country {
            if continent.is_none() {
                return Err(ExplorerError::NoContinentSelected.into());
            }
            explorer.select_country(country)?;
        }

        Ok(view_of(&explorer, initial_range))
    }

    /// Fetches one banknote directly from the API, bypassing the snapshot.
    pub async fn banknote_detail(&self, id: i64) -> Result<BanknoteDetailDto> {
        let mut banknote = self.source.fetch_banknote(id).await?;

        banknote.url_anverso = normalize_optional(banknote.url_anverso.as_deref());
        banknote.url_reverso = normalize_optional(banknote.url_reverso.as_deref());

        let bandera_url = banknote
            .pais_rel
            .as_ref()
            .map(|c| c.bandera.trim())
            .filter(|b| b.starts_with("http"))
            .map(normalize_image_url);

        let enriched = enrich(banknote);

        Ok(BanknoteDetailDto {
            continent: enriched.continent,
            codigo_pais: enriched.country_code,
            precio_numerico: enriched.numeric_price,
            bandera_url,
            banknote: enriched.banknote,
        })
    }
}

fn parse_continent(label: &str) -> Result<Continent> {
    Continent::from_label(label).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown continent '{}'. Expected one of: {}",
            label.trim(),
            Continent::ALL
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

fn view_of(explorer: &Explorer, initial_range: PriceRange) -> ExplorerViewDto {
    let stage = explorer.stage().clone();
    let price = *explorer.price();

    let (continentes, paises, billetes) = match stage {
        Stage::Continents => (Some(explorer.continents().to_vec()), None, None),
        Stage::Countries { .. } => (None, Some(explorer.countries().to_vec()), None),
        Stage::Banknotes { .. } => (None, None, Some(explorer.visible().to_vec())),
    };

    ExplorerViewDto {
        navegacion: stage,
        continentes,
        paises,
        billetes,
        total_pais: explorer.total_in_country(),
        filtros: FilterStateDto {
            texto: explorer.text().to_string(),
            rango_precios: price,
            rango_inicial: initial_range,
            filtros_activos: explorer.has_active_filters(),
            slider_izquierda: price.left_percent(),
            slider_ancho: price.width_percent(),
        },
    }
}

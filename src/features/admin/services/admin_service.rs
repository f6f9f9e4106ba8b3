use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::error::Result;
use crate::features::admin::dtos::{
    BanknoteDto, BanknoteListQuery, CreateCountryDto, InventoryStatisticsDto, LabelCountDto,
};
use crate::features::catalog::taxonomy::EnrichedBanknote;
use crate::features::catalog::CatalogService;
use crate::modules::catalog_api::{Banknote, BanknoteFlagsPatch, CatalogAdmin, Country, FeatureTag, Page};

const UNGRADED_LABEL: &str = "Sin estado";
const TOP_FEATURES: usize = 10;

/// Service for catalog administration.
///
/// Every write is forwarded with the caller's token and drops the cached catalog
/// snapshot so public views reflect it on the next read.
pub struct AdminService {
    catalog_admin: Arc<dyn CatalogAdmin>,
    catalog: Arc<CatalogService>,
}

impl AdminService {
    pub fn new(catalog_admin: Arc<dyn CatalogAdmin>, catalog: Arc<CatalogService>) -> Self {
        Self {
            catalog_admin,
            catalog,
        }
    }

    pub async fn list_banknotes(&self, token: &str, query: BanknoteListQuery) -> Result<Page<Banknote>> {
        self.catalog_admin
            .list_banknotes(token, &query.into_filter())
            .await
    }

    pub async fn create_country(&self, token: &str, dto: CreateCountryDto) -> Result<Country> {
        let country = self
            .catalog_admin
            .create_country(token, &dto.into_draft())
            .await?;
        self.catalog.invalidate().await;
        Ok(country)
    }

    pub async fn create_banknote(&self, token: &str, dto: BanknoteDto) -> Result<Banknote> {
        let banknote = self
            .catalog_admin
            .create_banknote(token, &dto.into_draft())
            .await?;
        self.catalog.invalidate().await;
        Ok(banknote)
    }

    pub async fn update_banknote(&self, token: &str, id: i64, dto: BanknoteDto) -> Result<Banknote> {
        let banknote = self
            .catalog_admin
            .update_banknote(token, id, &dto.into_draft())
            .await?;
        self.catalog.invalidate().await;
        Ok(banknote)
    }

    pub async fn delete_banknote(&self, token: &str, id: i64) -> Result<()> {
        self.catalog_admin.delete_banknote(token, id).await?;
        self.catalog.invalidate().await;
        Ok(())
    }

    pub async fn set_sold(&self, token: &str, id: i64, sold: bool) -> Result<Banknote> {
        self.patch_flags(
            token,
            id,
            BanknoteFlagsPatch {
                vendido: Some(sold),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_featured(&self, token: &str, id: i64, featured: bool) -> Result<Banknote> {
        self.patch_flags(
            token,
            id,
            BanknoteFlagsPatch {
                destacado: Some(featured),
                ..Default::default()
            },
        )
        .await
    }

    async fn patch_flags(&self, token: &str, id: i64, patch: BanknoteFlagsPatch) -> Result<Banknote> {
        let banknote = self
            .catalog_admin
            .patch_banknote_flags(token, id, &patch)
            .await?;
        tracing::info!(
            "Banknote {} flags updated (vendido: {}, destacado: {})",
            id,
            banknote.vendido,
            banknote.destacado
        );
        self.catalog.invalidate().await;
        Ok(banknote)
    }

    pub async fn list_features(&self, token: &str) -> Result<Vec<FeatureTag>> {
        self.catalog_admin.list_features(token).await
    }

    pub async fn statistics(&self) -> Result<InventoryStatisticsDto> {
        let snapshot = self.catalog.snapshot().await?;
        Ok(compute_statistics(&snapshot.banknotes))
    }
}

fn decimal_price(banknote: &Banknote) -> Decimal {
    banknote
        .precio
        .as_deref()
        .and_then(|p| Decimal::from_str(p.trim()).ok())
        .filter(|p| !p.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

/// Sorted by count descending, then label, so the output is deterministic.
fn ranked(counts: HashMap<String, usize>) -> Vec<LabelCountDto> {
    let mut ranked: Vec<LabelCountDto> = counts
        .into_iter()
        .map(|(nombre, total)| LabelCountDto { nombre, total })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.nombre.cmp(&b.nombre)));
    ranked
}

pub fn compute_statistics(banknotes: &[EnrichedBanknote]) -> InventoryStatisticsDto {
    let mut total_value = Decimal::ZERO;
    let mut available_value = Decimal::ZERO;
    let mut sold = 0;
    let mut featured = 0;
    let mut by_country: HashMap<String, usize> = HashMap::new();
    let mut by_grade: HashMap<String, usize> = HashMap::new();
    let mut by_feature: HashMap<String, usize> = HashMap::new();

    for enriched in banknotes {
        let banknote = &enriched.banknote;
        let price = decimal_price(banknote);

        total_value += price;
        if banknote.vendido {
            sold += 1;
        } else {
            available_value += price;
        }
        if banknote.destacado {
            featured += 1;
        }

        *by_country.entry(enriched.country_name.clone()).or_default() += 1;
        let grade = banknote
            .estado
            .map(|g| g.label().to_string())
            .unwrap_or_else(|| UNGRADED_LABEL.to_string());
        *by_grade.entry(grade).or_default() += 1;
        for feature in &banknote.caracteristicas {
            *by_feature.entry(feature.nombre.clone()).or_default() += 1;
        }
    }

    let mut caracteristicas_populares = ranked(by_feature);
    caracteristicas_populares.truncate(TOP_FEATURES);

    InventoryStatisticsDto {
        total_billetes: banknotes.len(),
        total_vendidos: sold,
        total_disponibles: banknotes.len() - sold,
        total_destacados: featured,
        valor_total_inventario: total_value.normalize().to_string(),
        valor_inventario_disponible: available_value.normalize().to_string(),
        por_pais: ranked(by_country),
        por_estado: ranked(by_grade),
        caracteristicas_populares,
    }
}

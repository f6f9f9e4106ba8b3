use async_trait::async_trait;
use serde_json::Value;

use crate::core::config::UpstreamConfig;
use crate::core::error::{AppError, Result};
use crate::modules::upstream::{self, build_http_client, transport_error};

use super::models::{
    Banknote, BanknoteDraft, BanknoteFlagsPatch, BanknoteListFilter, Country, CountryDraft,
    FeatureTag,
};
use super::payload::{decode_list, Page};

const SERVICE: &str = "Catalog";

/// Public, unauthenticated reads of the catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<Country>>;

    /// Every banknote joined with its country reference
    async fn fetch_banknotes(&self) -> Result<Vec<Banknote>>;

    async fn fetch_banknote(&self, id: i64) -> Result<Banknote>;
}

/// Catalog writes and admin listings, performed with the caller's bearer token
#[async_trait]
pub trait CatalogAdmin: Send + Sync {
    async fn list_banknotes(&self, token: &str, filter: &BanknoteListFilter)
        -> Result<Page<Banknote>>;

    async fn create_country(&self, token: &str, draft: &CountryDraft) -> Result<Country>;

    async fn create_banknote(&self, token: &str, draft: &BanknoteDraft) -> Result<Banknote>;

    async fn update_banknote(&self, token: &str, id: i64, draft: &BanknoteDraft)
        -> Result<Banknote>;

    async fn patch_banknote_flags(
        &self,
        token: &str,
        id: i64,
        patch: &BanknoteFlagsPatch,
    ) -> Result<Banknote>;

    async fn delete_banknote(&self, token: &str, id: i64) -> Result<()>;

    async fn list_features(&self, token: &str) -> Result<Vec<FeatureTag>>;
}

/// HTTP client for the remote catalog API
pub struct CatalogApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl CatalogApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.catalog_api_url.clone(),
            http_client: build_http_client(config.timeout)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str, token: Option<&str>) -> Result<Value> {
        let mut request = self.http_client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("GET {}{}", self.base_url, path);

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        upstream::read_json(SERVICE, response).await
    }
}

#[async_trait]
impl CatalogSource for CatalogApiClient {
    async fn fetch_countries(&self) -> Result<Vec<Country>> {
        let payload = self.get_json("paises/paises-select", None).await?;
        let page = decode_list::<Country>(payload, "country");
        tracing::debug!("Fetched {} countries", page.items.len());
        Ok(page.items)
    }

    async fn fetch_banknotes(&self) -> Result<Vec<Banknote>> {
        let payload = self
            .get_json("billetes/billetes-select-jPaises", None)
            .await?;
        let page = decode_list::<Banknote>(payload, "banknote");
        tracing::debug!("Fetched {} banknotes", page.items.len());
        Ok(page.items)
    }

    async fn fetch_banknote(&self, id: i64) -> Result<Banknote> {
        let payload = self.get_json(&format!("billetes/{}", id), None).await?;

        serde_json::from_value::<Banknote>(payload).map_err(|e| {
            tracing::error!("Failed to parse banknote {}: {}", id, e);
            AppError::ExternalServiceError(format!("Failed to parse banknote {}: {}", id, e))
        })
    }
}

#[async_trait]
impl CatalogAdmin for CatalogApiClient {
    async fn list_banknotes(
        &self,
        token: &str,
        filter: &BanknoteListFilter,
    ) -> Result<Page<Banknote>> {
        let response = self
            .http_client
            .get(self.url("billetes/"))
            .bearer_auth(token)
            .query(filter)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let payload: Value = upstream::read_json(SERVICE, response).await?;
        Ok(decode_list::<Banknote>(payload, "banknote"))
    }

    async fn create_country(&self, token: &str, draft: &CountryDraft) -> Result<Country> {
        tracing::debug!("Creating country {}", draft.pais);

        let response = self
            .http_client
            .post(self.url("paises/"))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let country: Country = upstream::read_json(SERVICE, response).await?;
        tracing::info!("Created country {} ({})", country.pais, country.id);
        Ok(country)
    }

    async fn create_banknote(&self, token: &str, draft: &BanknoteDraft) -> Result<Banknote> {
        let response = self
            .http_client
            .post(self.url("billetes/"))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let banknote: Banknote = upstream::read_json(SERVICE, response).await?;
        tracing::info!("Created banknote {} ({})", banknote.denominacion, banknote.id);
        Ok(banknote)
    }

    async fn update_banknote(
        &self,
        token: &str,
        id: i64,
        draft: &BanknoteDraft,
    ) -> Result<Banknote> {
        let response = self
            .http_client
            .put(self.url(&format!("billetes/{}", id)))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        upstream::read_json(SERVICE, response).await
    }

    async fn patch_banknote_flags(
        &self,
        token: &str,
        id: i64,
        patch: &BanknoteFlagsPatch,
    ) -> Result<Banknote> {
        let response = self
            .http_client
            .patch(self.url(&format!("billetes/{}", id)))
            .bearer_auth(token)
            .json(patch)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        upstream::read_json(SERVICE, response).await
    }

    async fn delete_banknote(&self, token: &str, id: i64) -> Result<()> {
        let response = self
            .http_client
            .delete(self.url(&format!("billetes/{}", id)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        upstream::expect_success(SERVICE, response).await?;
        tracing::info!("Deleted banknote {}", id);
        Ok(())
    }

    async fn list_features(&self, token: &str) -> Result<Vec<FeatureTag>> {
        let payload = self.get_json("caracteristicas/", Some(token)).await?;
        Ok(decode_list::<FeatureTag>(payload, "feature").items)
    }
}

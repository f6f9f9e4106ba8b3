//! Boundary decoding of catalog list payloads
//!
//! The catalog API answers list endpoints either with a bare JSON array or with a
//! pagination envelope whose items sit under `billetes` or `items`. Everything is
//! normalized into a [`Page`] here so no caller has to inspect raw shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Raw list payload, discriminated once at the boundary
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogPayload {
    List(Vec<Value>),
    Envelope(Envelope),
    Unexpected(Value),
}

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(alias = "billetes")]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub total_pages: Option<i64>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_prev: Option<bool>,
}

/// One page of decoded records plus pagination facts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 0,
            total_pages: 0,
            has_next: false,
            has_prev: false,
        }
    }

    /// A whole, unpaginated list seen as a single page.
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self {
            items,
            total,
            page: 1,
            page_size: total,
            total_pages: if total > 0 { 1 } else { 0 },
            has_next: false,
            has_prev: false,
        }
    }
}

impl CatalogPayload {
    /// Decodes the payload into typed records.
    ///
    /// Records that fail to decode are skipped with a warning; a payload of any other
    /// shape yields an empty page.
    pub fn into_page<T: DeserializeOwned>(self, context: &str) -> Page<T> {
        match self {
            CatalogPayload::List(values) => Page::single(decode_items(values, context)),
            CatalogPayload::Envelope(envelope) => {
                let raw_len = envelope.items.len() as i64;
                let items = decode_items(envelope.items, context);

                let total = envelope.total.unwrap_or(raw_len).max(0);
                let page = envelope.page.unwrap_or(1).max(1);
                let page_size = envelope.page_size.unwrap_or(raw_len).max(0);
                let total_pages = envelope.total_pages.unwrap_or_else(|| {
                    if page_size > 0 {
                        (total + page_size - 1) / page_size
                    } else if total > 0 {
                        1
                    } else {
                        0
                    }
                });

                Page {
                    items,
                    total,
                    page,
                    page_size,
                    total_pages,
                    has_next: envelope.has_next.unwrap_or(page < total_pages),
                    has_prev: envelope.has_prev.unwrap_or(page > 1),
                }
            }
            CatalogPayload::Unexpected(value) => {
                tracing::warn!(
                    "Unexpected {} payload shape ({}), treating as empty",
                    context,
                    shape_name(&value)
                );
                Page::empty()
            }
        }
    }
}

/// Decodes any JSON value as a list payload; used where the body was already read.
pub fn decode_list<T: DeserializeOwned>(value: Value, context: &str) -> Page<T> {
    match serde_json::from_value::<CatalogPayload>(value) {
        Ok(payload) => payload.into_page(context),
        // Untagged with a catch-all variant only fails on exotic input
        Err(e) => {
            tracing::warn!("Failed to decode {} payload: {}", context, e);
            Page::empty()
        }
    }
}

fn decode_items<T: DeserializeOwned>(values: Vec<Value>, context: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping malformed {} record #{}: {}", context, index, e);
                None
            }
        })
        .collect()
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

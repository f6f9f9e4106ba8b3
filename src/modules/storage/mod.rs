//! Object storage for banknote and profile images
//!
//! The gateway only ever needs three things from storage: put an object at a chosen
//! path, remove it, and know its public URL. [`ObjectStore`] captures exactly that;
//! [`S3ObjectStore`] implements it for MinIO or any S3-compatible service.

use async_trait::async_trait;

use crate::core::error::Result;

mod s3_store;

#[cfg(test)]
pub mod memory;

pub use s3_store::S3ObjectStore;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under `key` and returns the key.
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    async fn remove(&self, key: &str) -> Result<()>;

    fn public_url(&self, key: &str) -> String;

    /// Recovers the object key from one of this store's public URLs.
    fn key_from_url(&self, url: &str) -> Option<String>;
}

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::ObjectStore;
use crate::core::error::{AppError, Result};

pub const MEMORY_BASE_URL: &str = "http://storage.test/img-billetes";

/// In-process object store for handler tests
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, (String, usize)>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn insert(&self, key: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), ("image/png".to_string(), 0));
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), data.len()));
        Ok(key.to_string())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Object '{}' not found", key)))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", MEMORY_BASE_URL, key)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", MEMORY_BASE_URL))
            .map(String::from)
    }
}

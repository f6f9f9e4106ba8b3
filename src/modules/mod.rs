//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for the remote catalog API and object storage.

pub mod catalog_api;
pub mod storage;
pub mod upstream;

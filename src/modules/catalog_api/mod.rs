//! Catalog API integration
//!
//! Typed client for the remote Numismatica catalog. Payloads are decoded once in
//! [`payload`]; callers only ever see [`Country`], [`Banknote`] and [`Page`].

mod client;
pub mod models;
pub mod payload;

pub use client::{CatalogAdmin, CatalogApiClient, CatalogSource};
pub use models::{
    Banknote, BanknoteDraft, BanknoteFlagsPatch, BanknoteListFilter, Country, CountryDraft,
    CountryRef, FeatureTag, Grade,
};
pub use payload::Page;

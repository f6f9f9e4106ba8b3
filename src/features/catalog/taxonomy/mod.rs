//! Catalog taxonomy pipeline
//!
//! Pure, synchronous transforms over fetched catalog data:
//! classification → enrichment → aggregation, plus the price/text filters and the
//! navigation state machine that drives them.

pub mod aggregation;
pub mod classifier;
pub mod enrichment;
pub mod explorer;
pub mod filter;
pub mod price_range;

pub use aggregation::{group_by_continent, group_by_country, ContinentGroup, CountryGroup};
pub use classifier::{classify, Continent};
pub use enrichment::{enrich_all, EnrichedBanknote};
pub use explorer::{Explorer, ExplorerError, Stage};
pub use price_range::{PriceInterval, PriceRange};

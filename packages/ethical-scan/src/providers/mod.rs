//! Concrete provider adapters.
//!
//! One adapter per external source, each implementing
//! [`Provider`](crate::traits::provider::Provider) and owning its own
//! response parsing.

pub mod barcode_lookup;
pub mod brand_ratings;
pub mod ethical_consumer;
pub mod google_search;
pub mod http;
pub mod open_food_facts;

pub use barcode_lookup::BarcodeLookup;
pub use brand_ratings::{BrandRatingDataset, BrandRatings};
pub use ethical_consumer::EthicalConsumer;
pub use google_search::GoogleSearch;
pub use http::{build_client, DEFAULT_USER_AGENT};
pub use open_food_facts::OpenFoodFacts;

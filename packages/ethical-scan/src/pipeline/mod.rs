//! Resolution pipeline.
//!
//! - Category classification (Food / ApparelOrPersonalCare / Other)
//! - Provider sequencing with per-call timeouts and fallback
//! - Report assembly with a source trail of every consultation

pub mod classify;
pub mod resolve;

pub use classify::{classify, food_status, Domain, FRIENDLY_FOOD_STATUS, STANDARD_FOOD_STATUS};
pub use resolve::{Resolver, ResolverBuilder};

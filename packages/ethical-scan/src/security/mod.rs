//! Credential handling for provider API keys.

pub mod credentials;

pub use credentials::{ApiCredentials, SecretString};

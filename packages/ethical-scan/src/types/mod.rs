//! Data types flowing through the pipeline.

pub mod barcode;
pub mod config;
pub mod finding;
pub mod product;
pub mod rating;
pub mod report;
pub mod search;

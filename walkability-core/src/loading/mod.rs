//! This module is responsible for loading data from external sources
//! (catalog files, matrix providers) and for the session configuration.

mod catalog;
mod config;
pub mod matrix;

pub use catalog::{Catalog, read_catalog, read_catalog_csv, read_catalog_json};
pub use config::{ProviderConfig, ProviderKind, WalkabilityConfig};
pub use matrix::{BatchLimits, build_cost_matrix, refresh_home_cells};

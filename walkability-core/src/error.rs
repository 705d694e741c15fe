use thiserror::Error;

use crate::providers::ProviderError;
use crate::routing::PlanError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Route planning failed: {0}")]
    Planning(#[from] PlanError),
    #[error("Invalid coordinates: lat {lat}, lon {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
    #[error("Home address could not be resolved: {0}")]
    HomeResolution(#[source] ProviderError),
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

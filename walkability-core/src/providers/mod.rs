//! External collaborators: geocoding and distance-matrix services.
//!
//! The core only depends on the two traits defined here. Concrete
//! implementations cover the Google Maps web services, an offline
//! straight-line estimate, and fixed tables for precomputed data.

mod google;
mod straight_line;
mod table;

use geo::Point;
use thiserror::Error;

use crate::model::MatrixCell;

pub use google::GoogleMapsClient;
pub use straight_line::StraightLineProvider;
pub use table::{StaticGeocoder, TableProvider};

/// Failure of a single call to an external service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Service returned status {0}")]
    Status(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Request too large: {origins}x{destinations}")]
    TooLarge { origins: usize, destinations: usize },
}

/// Rows of optional cells, one row per origin and one column per
/// destination. `None` marks a pair the service could not resolve.
pub type MatrixBlock = Vec<Vec<Option<MatrixCell>>>;

/// Resolves free-text addresses into coordinates (x = lon, y = lat)
pub trait Geocoder: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the address cannot be resolved.
    fn geocode(&self, address: &str) -> Result<Point<f64>, ProviderError>;
}

/// Supplies walking distances and durations between coordinates
pub trait DistanceMatrixProvider: Send + Sync {
    /// Fetches the block `origins × destinations`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the whole request fails. Individual
    /// unresolved pairs are reported as `None` cells instead.
    fn fetch(
        &self,
        origins: &[Point<f64>],
        destinations: &[Point<f64>],
    ) -> Result<MatrixBlock, ProviderError>;
}

/// Geocoder for sessions that only use explicit coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    fn geocode(&self, _address: &str) -> Result<Point<f64>, ProviderError> {
        Err(ProviderError::Status("NO_GEOCODER".to_string()))
    }
}

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::matrix::BatchLimits;
use crate::Error;
use crate::providers::{
    DistanceMatrixProvider, Geocoder, GoogleMapsClient, NoGeocoder, StraightLineProvider,
};
use crate::session::HomeAddress;

/// Top-level configuration of a walkability session.
///
/// Usually read from a TOML file by the command-line tool or the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WalkabilityConfig {
    /// Point-of-interest catalog (JSON or CSV)
    pub catalog: Option<PathBuf>,
    /// Home address or coordinates; the default home is used when absent
    pub home: Option<HomeAddress>,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Google,
    StraightLine,
}

/// Settings handed to the geocoding and distance-matrix collaborators
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub geocode_url: String,
    pub distance_matrix_url: String,
    /// Timeout of a single HTTP call, seconds
    pub timeout_secs: u64,
    pub max_elements: usize,
    pub max_origins: usize,
    pub max_destinations: usize,
    /// Walking speed for the straight-line estimate, meters per second
    pub walking_speed: f64,
    /// Ratio of street distance to straight-line distance
    pub detour_factor: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Google,
            api_key: None,
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            distance_matrix_url: "https://maps.googleapis.com/maps/api/distancematrix/json"
                .to_string(),
            timeout_secs: 10,
            max_elements: 100,
            max_origins: 25,
            max_destinations: 25,
            walking_speed: 1.4,
            detour_factor: 1.3,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn batch_limits(&self) -> BatchLimits {
        BatchLimits {
            max_elements: self.max_elements,
            max_origins: self.max_origins,
            max_destinations: self.max_destinations,
        }
    }

    /// Creates the geocoder and matrix provider this configuration describes.
    ///
    /// The straight-line provider has no geocoder; sessions using it must
    /// give home as coordinates.
    ///
    /// # Errors
    ///
    /// Fails when the Google provider is selected without an API key or the
    /// HTTP client cannot be created.
    pub fn build_providers(
        &self,
    ) -> Result<(Arc<dyn Geocoder>, Arc<dyn DistanceMatrixProvider>), Error> {
        match self.kind {
            ProviderKind::Google => {
                let client = Arc::new(GoogleMapsClient::new(self)?);
                let geocoder: Arc<dyn Geocoder> = client.clone();
                let matrix: Arc<dyn DistanceMatrixProvider> = client;
                Ok((geocoder, matrix))
            }
            ProviderKind::StraightLine => {
                let geocoder: Arc<dyn Geocoder> = Arc::new(NoGeocoder);
                let matrix: Arc<dyn DistanceMatrixProvider> = Arc::new(
                    StraightLineProvider::new(self.walking_speed, self.detour_factor),
                );
                Ok((geocoder, matrix))
            }
        }
    }
}

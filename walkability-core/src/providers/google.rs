//! Google Maps Geocoding and Distance Matrix web services

use geo::Point;
use itertools::Itertools;
use log::debug;
use serde::Deserialize;

use super::{DistanceMatrixProvider, Geocoder, MatrixBlock, ProviderError};
use crate::Error;
use crate::loading::ProviderConfig;
use crate::model::MatrixCell;

/// Blocking client for the Google Maps JSON APIs.
///
/// Every call uses the timeout from [`ProviderConfig`]; a timeout is reported
/// as [`ProviderError::Timeout`].
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    client: reqwest::blocking::Client,
    api_key: String,
    geocode_url: String,
    distance_matrix_url: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Deserialize)]
struct ValueField {
    value: f64,
}

impl GoogleMapsClient {
    /// # Errors
    ///
    /// Fails when the configuration has no API key or the HTTP client
    /// cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, Error> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::InvalidData("Google Maps API key is not set".to_string()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::InvalidData(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            geocode_url: config.geocode_url.clone(),
            distance_matrix_url: config.distance_matrix_url.clone(),
        })
    }

    fn get<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, ProviderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16().to_string()));
        }

        response
            .json::<T>()
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(e.to_string())
    }
}

fn format_locations(points: &[Point<f64>]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.y(), p.x()))
        .join("|")
}

impl Geocoder for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<Point<f64>, ProviderError> {
        let response: GeocodeResponse = self.get(&self.geocode_url, &[("address", address)])?;

        if response.status != "OK" {
            return Err(ProviderError::Status(response.status));
        }

        let location = response
            .results
            .first()
            .map(|r| &r.geometry.location)
            .ok_or_else(|| ProviderError::Malformed("no geocoding results".to_string()))?;

        Ok(Point::new(location.lng, location.lat))
    }
}

impl DistanceMatrixProvider for GoogleMapsClient {
    fn fetch(
        &self,
        origins: &[Point<f64>],
        destinations: &[Point<f64>],
    ) -> Result<MatrixBlock, ProviderError> {
        debug!(
            "Requesting {}x{} distance matrix block",
            origins.len(),
            destinations.len()
        );

        let origins_param = format_locations(origins);
        let destinations_param = format_locations(destinations);
        let response: DistanceMatrixResponse = self.get(
            &self.distance_matrix_url,
            &[
                ("origins", origins_param.as_str()),
                ("destinations", destinations_param.as_str()),
                ("mode", "walking"),
                ("units", "metric"),
            ],
        )?;

        match response.status.as_str() {
            "OK" => {}
            "MAX_ELEMENTS_EXCEEDED" | "MAX_DIMENSIONS_EXCEEDED" => {
                return Err(ProviderError::TooLarge {
                    origins: origins.len(),
                    destinations: destinations.len(),
                });
            }
            _ => return Err(ProviderError::Status(response.status)),
        }

        Ok(response
            .rows
            .into_iter()
            .map(|row| row.elements.into_iter().map(element_to_cell).collect())
            .collect())
    }
}

fn element_to_cell(element: DistanceMatrixElement) -> Option<MatrixCell> {
    if element.status != "OK" {
        return None;
    }
    match (element.distance, element.duration) {
        (Some(distance), Some(duration)) => Some(MatrixCell::new(distance.value, duration.value)),
        _ => None,
    }
}

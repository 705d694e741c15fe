//! Offline walking estimate from great-circle distance

use geo::{Distance, Haversine, Point};

use super::{DistanceMatrixProvider, MatrixBlock, ProviderError};
use crate::model::MatrixCell;

/// Estimates walking cost without a routing service.
///
/// Distance is the haversine distance scaled by a detour factor, and duration
/// is that distance divided by a constant walking speed. Useful offline and
/// as a baseline; never fails.
#[derive(Debug, Clone, Copy)]
pub struct StraightLineProvider {
    walking_speed: f64,
    detour_factor: f64,
}

impl StraightLineProvider {
    /// `walking_speed` in meters per second, `detour_factor` >= 1
    pub fn new(walking_speed: f64, detour_factor: f64) -> Self {
        Self {
            walking_speed,
            detour_factor,
        }
    }

    pub fn estimate(&self, from: Point<f64>, to: Point<f64>) -> MatrixCell {
        let distance = Haversine.distance(from, to) * self.detour_factor;
        MatrixCell::new(distance, distance / self.walking_speed)
    }
}

impl Default for StraightLineProvider {
    fn default() -> Self {
        Self::new(1.4, 1.3)
    }
}

impl DistanceMatrixProvider for StraightLineProvider {
    fn fetch(
        &self,
        origins: &[Point<f64>],
        destinations: &[Point<f64>],
    ) -> Result<MatrixBlock, ProviderError> {
        Ok(origins
            .iter()
            .map(|&from| {
                destinations
                    .iter()
                    .map(|&to| Some(self.estimate(from, to)))
                    .collect()
            })
            .collect())
    }
}

//! Providers backed by fixed, precomputed data

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Point;
use hashbrown::HashMap;

use super::{DistanceMatrixProvider, Geocoder, MatrixBlock, ProviderError};
use crate::model::{CostMatrix, MatrixCell};

/// Answers matrix requests from a precomputed table.
///
/// Coordinates are matched exactly against the table's coordinate list;
/// unknown coordinates produce unresolved (`None`) cells. The provider can be
/// told to reject large requests, to fail or time out on requests touching
/// specific pairs, or to deny every request.
#[derive(Debug)]
pub struct TableProvider {
    coordinates: Vec<Point<f64>>,
    matrix: CostMatrix,
    max_elements: Option<usize>,
    failing_pairs: Vec<(usize, usize, ProviderError)>,
    status_error: Option<String>,
    requested_cells: AtomicUsize,
    requests: AtomicUsize,
}

impl TableProvider {
    /// `matrix` must be `coordinates.len()` square; rows and columns follow
    /// the coordinate order.
    pub fn new(coordinates: Vec<Point<f64>>, matrix: CostMatrix) -> Self {
        assert_eq!(
            coordinates.len(),
            matrix.size(),
            "table coordinates and matrix size differ"
        );
        Self {
            coordinates,
            matrix,
            max_elements: None,
            failing_pairs: Vec::new(),
            status_error: None,
            requested_cells: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    /// Reject requests with more than `max_elements` cells
    #[must_use]
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = Some(max_elements);
        self
    }

    /// Fail every request that includes the pair `from → to`
    #[must_use]
    pub fn with_failing_pair(self, from: Point<f64>, to: Point<f64>) -> Self {
        self.with_pair_error(from, to, ProviderError::Transport("connection reset".to_string()))
    }

    /// Time out every request that includes the pair `from → to`
    #[must_use]
    pub fn with_timeout_pair(self, from: Point<f64>, to: Point<f64>) -> Self {
        self.with_pair_error(from, to, ProviderError::Timeout)
    }

    /// Answer every request with a non-OK status, like a denied API key
    #[must_use]
    pub fn with_status_error(mut self, status: &str) -> Self {
        self.status_error = Some(status.to_string());
        self
    }

    fn with_pair_error(mut self, from: Point<f64>, to: Point<f64>, error: ProviderError) -> Self {
        if let (Some(i), Some(j)) = (self.position(from), self.position(to)) {
            self.failing_pairs.push((i, j, error));
        }
        self
    }

    /// Cells asked for so far, including those of rejected requests
    pub fn requested_cells(&self) -> usize {
        self.requested_cells.load(Ordering::Relaxed)
    }

    /// Requests received so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn position(&self, point: Point<f64>) -> Option<usize> {
        self.coordinates.iter().position(|&p| p == point)
    }
}

impl DistanceMatrixProvider for TableProvider {
    fn fetch(
        &self,
        origins: &[Point<f64>],
        destinations: &[Point<f64>],
    ) -> Result<MatrixBlock, ProviderError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.requested_cells
            .fetch_add(origins.len() * destinations.len(), Ordering::Relaxed);

        if let Some(status) = &self.status_error {
            return Err(ProviderError::Status(status.clone()));
        }

        if let Some(max) = self.max_elements {
            if origins.len() * destinations.len() > max {
                return Err(ProviderError::TooLarge {
                    origins: origins.len(),
                    destinations: destinations.len(),
                });
            }
        }

        let rows: Vec<Option<usize>> = origins.iter().map(|&p| self.position(p)).collect();
        let cols: Vec<Option<usize>> = destinations.iter().map(|&p| self.position(p)).collect();

        let failure = self.failing_pairs.iter().find(|(i, j, _)| {
            rows.iter().flatten().any(|r| r == i) && cols.iter().flatten().any(|c| c == j)
        });
        if let Some((_, _, error)) = failure {
            return Err(error.clone());
        }

        Ok(rows
            .iter()
            .map(|row| {
                cols.iter()
                    .map(|col| match (row, col) {
                        (Some(i), Some(j)) => {
                            Some(self.matrix.cell(*i, *j)).filter(MatrixCell::is_reachable)
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect())
    }
}

/// Geocoder answering from a fixed address table
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    addresses: HashMap<String, Point<f64>>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_address(mut self, address: &str, location: Point<f64>) -> Self {
        self.addresses.insert(address.to_lowercase(), location);
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, address: &str) -> Result<Point<f64>, ProviderError> {
        self.addresses
            .get(&address.to_lowercase())
            .copied()
            .ok_or_else(|| ProviderError::Status("ZERO_RESULTS".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TableProvider {
        let coordinates = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let matrix = CostMatrix::from_rows(
            &[vec![0.0, 100.0], vec![110.0, 0.0]],
            &[vec![0.0, 70.0], vec![80.0, 0.0]],
        )
        .unwrap();
        TableProvider::new(coordinates, matrix)
    }

    #[test]
    fn answers_known_coordinates() {
        let provider = provider();
        let block = provider
            .fetch(&[Point::new(1.0, 1.0)], &[Point::new(0.0, 0.0), Point::new(9.0, 9.0)])
            .unwrap();

        assert_eq!(block[0][0], Some(MatrixCell::new(110.0, 80.0)));
        assert_eq!(block[0][1], None);
        assert_eq!(provider.requested_cells(), 2);
    }

    #[test]
    fn rejects_oversized_and_failing_requests() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let limited = provider().with_max_elements(2);
        assert!(matches!(
            limited.fetch(&points, &points),
            Err(ProviderError::TooLarge { .. })
        ));
        assert!(limited.fetch(&points[..1], &points).is_ok());

        let flaky = provider().with_failing_pair(points[0], points[1]);
        assert!(flaky.fetch(&points[..1], &points).is_err());
        assert!(flaky.fetch(&points[1..], &points).is_ok());

        let slow = provider().with_timeout_pair(points[1], points[0]);
        assert_eq!(slow.fetch(&points, &points[..1]), Err(ProviderError::Timeout));

        let denied = provider().with_status_error("REQUEST_DENIED");
        assert_eq!(
            denied.fetch(&points[..1], &points[..1]),
            Err(ProviderError::Status("REQUEST_DENIED".to_string()))
        );
        assert_eq!(denied.requests(), 1);
    }

    #[test]
    fn static_geocoder_ignores_case() {
        let geocoder = StaticGeocoder::new().with_address("Powell Library", Point::new(-118.44, 34.07));
        assert_eq!(
            geocoder.geocode("powell library").unwrap(),
            Point::new(-118.44, 34.07)
        );
        assert!(geocoder.geocode("nowhere").is_err());
    }
}

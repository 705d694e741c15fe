//! Ordered set of points with home at index 0

use geo::Point;

use super::PointOfInterest;
use crate::{HOME_INDEX, PointIndex};

/// Ordered, immutable sequence of points.
///
/// Index 0 is always the home point. The order defines the row/column order
/// of the cost matrix, and once built points are only referenced by index.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<PointOfInterest>,
}

impl PointSet {
    /// Builds a point set with `home` at index 0 followed by `points` in
    /// their original order. The caller's slice is copied, never modified.
    pub fn new(home: Point<f64>, points: &[PointOfInterest]) -> Self {
        let mut all = Vec::with_capacity(points.len() + 1);
        all.push(PointOfInterest::home(home));
        all.extend_from_slice(points);
        Self { points: all }
    }

    /// Returns a copy with the home point moved to `home`.
    /// Every other point keeps its index.
    pub fn with_home(&self, home: Point<f64>) -> Self {
        let mut points = self.points.clone();
        points[HOME_INDEX].geometry = home;
        Self { points }
    }

    pub fn home(&self) -> &PointOfInterest {
        &self.points[HOME_INDEX]
    }

    pub fn get(&self, index: PointIndex) -> Option<&PointOfInterest> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.points.iter()
    }

    /// Coordinates in index order, as handed to the matrix provider
    pub fn coordinates(&self) -> Vec<Point<f64>> {
        self.points.iter().map(|p| p.geometry).collect()
    }

    /// Number of points including home
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true: home is always present
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

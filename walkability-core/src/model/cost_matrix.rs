//! Pairwise walking distance/duration matrices

use crate::{Meters, PointIndex, Seconds};

/// Walking cost of one origin/destination pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixCell {
    pub distance: Meters,
    pub duration: Seconds,
}

impl MatrixCell {
    /// Sentinel for a pair the provider could not resolve
    pub const UNREACHABLE: MatrixCell = MatrixCell {
        distance: f64::INFINITY,
        duration: f64::INFINITY,
    };

    /// Builds a cell, mapping negative or NaN values to unreachable
    pub fn new(distance: Meters, duration: Seconds) -> Self {
        let valid = |v: f64| !v.is_nan() && v >= 0.0;
        if valid(distance) && valid(duration) {
            Self { distance, duration }
        } else {
            Self::UNREACHABLE
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.duration.is_finite() && self.distance.is_finite()
    }
}

/// Two parallel N×N matrices (distance and duration) in point-set order.
///
/// Stored row-major in flat vectors. A cell that could not be obtained holds
/// `f64::INFINITY` in both matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    distances: Vec<Meters>,
    durations: Vec<Seconds>,
}

impl CostMatrix {
    /// Matrix of the given size with every cell unreachable
    pub fn unreachable(size: usize) -> Self {
        Self {
            size,
            distances: vec![f64::INFINITY; size * size],
            durations: vec![f64::INFINITY; size * size],
        }
    }

    /// Builds a matrix from nested rows of distances and durations.
    ///
    /// Returns `None` when the rows are not square or the two matrices
    /// differ in shape.
    pub fn from_rows(distances: &[Vec<Meters>], durations: &[Vec<Seconds>]) -> Option<Self> {
        let size = durations.len();
        if distances.len() != size
            || distances.iter().chain(durations).any(|row| row.len() != size)
        {
            return None;
        }

        let mut matrix = Self::unreachable(size);
        for (i, (dist_row, dur_row)) in distances.iter().zip(durations).enumerate() {
            for (j, (&distance, &duration)) in dist_row.iter().zip(dur_row).enumerate() {
                matrix.set(i, j, MatrixCell::new(distance, duration));
            }
        }
        Some(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, from: PointIndex, to: PointIndex) -> MatrixCell {
        let idx = self.offset(from, to);
        MatrixCell {
            distance: self.distances[idx],
            duration: self.durations[idx],
        }
    }

    pub fn duration(&self, from: PointIndex, to: PointIndex) -> Seconds {
        self.durations[self.offset(from, to)]
    }

    pub fn distance(&self, from: PointIndex, to: PointIndex) -> Meters {
        self.distances[self.offset(from, to)]
    }

    /// Stores a cell; negative or NaN values are stored as unreachable.
    pub fn set(&mut self, from: PointIndex, to: PointIndex, cell: MatrixCell) {
        let cell = MatrixCell::new(cell.distance, cell.duration);
        let idx = self.offset(from, to);
        self.distances[idx] = cell.distance;
        self.durations[idx] = cell.duration;
    }

    /// Number of cells holding the unreachable sentinel
    pub fn unreachable_count(&self) -> usize {
        self.durations.iter().filter(|d| d.is_infinite()).count()
    }

    fn offset(&self, from: PointIndex, to: PointIndex) -> usize {
        assert!(
            from < self.size && to < self.size,
            "cell ({from}, {to}) outside {size}x{size} matrix",
            size = self.size
        );
        from * self.size + to
    }
}

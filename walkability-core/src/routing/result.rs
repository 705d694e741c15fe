use serde::Serialize;

use crate::model::{Category, CostMatrix};
use crate::{HOME_INDEX, Meters, PointIndex, Seconds};

/// A point visited to satisfy one requested category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    pub index: PointIndex,
    pub category: Category,
}

/// One walk between consecutive positions of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: PointIndex,
    pub to: PointIndex,
    pub duration: Seconds,
    pub distance: Meters,
}

impl RouteLeg {
    pub(crate) fn walk(matrix: &CostMatrix, from: PointIndex, to: PointIndex) -> Self {
        let cell = matrix.cell(from, to);
        Self {
            from,
            to,
            duration: cell.duration,
            distance: cell.distance,
        }
    }
}

/// Outcome of planning one route.
///
/// `legs` always ends with the walk back home, so there is one more leg than
/// there are stops and the step count is never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub stops: Vec<RouteStop>,
    pub legs: Vec<RouteLeg>,
    pub total_duration: Seconds,
    pub total_distance: Meters,
}

impl RouteResult {
    pub(crate) fn new(stops: Vec<RouteStop>, legs: Vec<RouteLeg>) -> Self {
        let total_duration = legs.iter().map(|leg| leg.duration).sum();
        let total_distance = legs.iter().map(|leg| leg.distance).sum();
        Self {
            stops,
            legs,
            total_duration,
            total_distance,
        }
    }

    /// Number of legs walked, including the return home
    pub fn steps(&self) -> usize {
        self.legs.len()
    }

    /// Average walking time per leg, seconds
    #[allow(clippy::cast_precision_loss)]
    pub fn average_duration(&self) -> Seconds {
        self.total_duration / self.steps() as f64
    }

    /// Average walking distance per leg, meters
    #[allow(clippy::cast_precision_loss)]
    pub fn average_distance(&self) -> Meters {
        self.total_distance / self.steps() as f64
    }

    /// Full sequence of positions, starting and ending at home
    pub fn path(&self) -> Vec<PointIndex> {
        std::iter::once(HOME_INDEX)
            .chain(self.legs.iter().map(|leg| leg.to))
            .collect()
    }

    /// False when any leg crosses an unreachable matrix cell
    pub fn is_reachable(&self) -> bool {
        self.total_duration.is_finite()
    }
}

//! Greedy nearest-category walk over a precomputed duration matrix.
//!
//! Starting at home, each requested category is satisfied by the candidate
//! point with the smallest walking duration from the current position. After
//! the last category the route walks back home.
//!
//! Visited points stay eligible: a point tagged both `desserts` and
//! `coffee_shop` may serve two consecutive stops. Ties go to the candidate
//! that appears first in the category index (lowest point index).

use thiserror::Error;

use super::{RouteLeg, RouteResult, RouteStop};
use crate::model::{Category, CategoryIndex, CostMatrix};
use crate::{HOME_INDEX, PointIndex, Seconds};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("No point carries category '{0}'")]
    NoCandidateForCategory(Category),
    #[error("Point index {index} is outside the {size}x{size} cost matrix")]
    IndexOutOfRange { index: PointIndex, size: usize },
}

/// Plans a route visiting `targets` in order.
///
/// An empty `targets` slice yields the single home → home leg, so the
/// average equals the home self-cost.
///
/// # Errors
///
/// [`PlanError::NoCandidateForCategory`] when a requested category has no
/// points; [`PlanError::IndexOutOfRange`] when the index and matrix disagree.
pub fn plan_route(
    index: &CategoryIndex,
    matrix: &CostMatrix,
    targets: &[Category],
) -> Result<RouteResult, PlanError> {
    check_index(HOME_INDEX, matrix)?;

    let mut current = HOME_INDEX;
    let mut stops = Vec::with_capacity(targets.len());
    let mut legs = Vec::with_capacity(targets.len() + 1);

    for category in targets {
        let next = nearest_candidate(index.candidates(category), matrix, current)?
            .ok_or_else(|| PlanError::NoCandidateForCategory(category.clone()))?;

        legs.push(RouteLeg::walk(matrix, current, next));
        stops.push(RouteStop {
            index: next,
            category: category.clone(),
        });
        current = next;
    }

    legs.push(RouteLeg::walk(matrix, current, HOME_INDEX));

    Ok(RouteResult::new(stops, legs))
}

/// Candidate with the smallest duration from `from`; first one wins ties
fn nearest_candidate(
    candidates: &[PointIndex],
    matrix: &CostMatrix,
    from: PointIndex,
) -> Result<Option<PointIndex>, PlanError> {
    let mut best: Option<(PointIndex, Seconds)> = None;

    for &candidate in candidates {
        check_index(candidate, matrix)?;
        let duration = matrix.duration(from, candidate);
        match best {
            Some((_, best_duration)) if duration >= best_duration => {}
            _ => best = Some((candidate, duration)),
        }
    }

    Ok(best.map(|(candidate, _)| candidate))
}

fn check_index(index: PointIndex, matrix: &CostMatrix) -> Result<(), PlanError> {
    if index < matrix.size() {
        Ok(())
    } else {
        Err(PlanError::IndexOutOfRange {
            index,
            size: matrix.size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PointOfInterest, PointSet};
    use geo::Point;

    /// Home, two museums (A, B), a cafe and a dual-tagged creamery
    fn fixture() -> (CategoryIndex, CostMatrix) {
        let points = vec![
            PointOfInterest::new("A", 0.0, 0.001, [Category::MUSEUM]).unwrap(),
            PointOfInterest::new("B", 0.0, 0.002, [Category::MUSEUM]).unwrap(),
            PointOfInterest::new("Cafe", 0.0, 0.003, [Category::COFFEE_SHOP]).unwrap(),
            PointOfInterest::new(
                "Creamery",
                0.0,
                0.004,
                [Category::DESSERTS, Category::COFFEE_SHOP],
            )
            .unwrap(),
        ];
        let set = PointSet::new(Point::new(0.0, 0.0), &points);
        let durations = vec![
            vec![0.0, 10.0, 5.0, 30.0, 20.0],
            vec![10.0, 0.0, 8.0, 9.0, 9.0],
            vec![5.0, 8.0, 0.0, 12.0, 4.0],
            vec![30.0, 9.0, 12.0, 0.0, 6.0],
            vec![20.0, 9.0, 4.0, 6.0, 0.0],
        ];
        let distances: Vec<Vec<f64>> = durations
            .iter()
            .map(|row| row.iter().map(|d| d * 1.4).collect())
            .collect();
        let matrix = CostMatrix::from_rows(&distances, &durations).unwrap();
        (CategoryIndex::build(&set), matrix)
    }

    #[test]
    fn picks_nearest_museum_and_returns_home() {
        let (index, matrix) = fixture();
        let route = plan_route(&index, &matrix, &[Category::MUSEUM]).unwrap();

        assert_eq!(route.stops[0].index, 2);
        assert_eq!(route.total_duration, 10.0);
        assert_eq!(route.steps(), 2);
        assert_eq!(route.average_duration(), 5.0);
        assert_eq!(route.path(), vec![0, 2, 0]);
    }

    #[test]
    fn chains_from_current_position() {
        let (index, matrix) = fixture();
        let route = plan_route(
            &index,
            &matrix,
            &[Category::MUSEUM, Category::COFFEE_SHOP, Category::DESSERTS],
        )
        .unwrap();

        // B, then the creamery (4 < 12 from B), then the creamery again
        assert_eq!(route.path(), vec![0, 2, 4, 4, 0]);
        assert_eq!(route.total_duration, 5.0 + 4.0 + 0.0 + 20.0);
        assert_eq!(route.steps(), 4);
        assert!((route.total_distance - route.total_duration * 1.4).abs() < 1e-9);
    }

    #[test]
    fn empty_route_is_single_home_leg() {
        let (index, mut matrix) = fixture();
        matrix.set(0, 0, crate::model::MatrixCell::new(3.0, 2.0));
        let route = plan_route(&index, &matrix, &[]).unwrap();

        assert!(route.stops.is_empty());
        assert_eq!(route.steps(), 1);
        assert_eq!(route.average_duration(), 2.0);
        assert_eq!(route.path(), vec![0, 0]);
    }

    #[test]
    fn missing_category_is_an_error() {
        let (index, matrix) = fixture();
        let result = plan_route(&index, &matrix, &[Category::MUSEUM, Category::LIBRARY]);
        assert_eq!(
            result,
            Err(PlanError::NoCandidateForCategory(Category::LIBRARY))
        );
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let (index, mut matrix) = fixture();
        matrix.set(0, 1, crate::model::MatrixCell::new(7.0, 5.0));
        for _ in 0..3 {
            let route = plan_route(&index, &matrix, &[Category::MUSEUM]).unwrap();
            assert_eq!(route.stops[0].index, 1);
        }
    }

    #[test]
    fn unreachable_candidates_are_deprioritized() {
        let (index, mut matrix) = fixture();
        matrix.set(0, 2, crate::model::MatrixCell::UNREACHABLE);
        let route = plan_route(&index, &matrix, &[Category::MUSEUM]).unwrap();
        assert_eq!(route.stops[0].index, 1);
        assert!(route.is_reachable());

        matrix.set(0, 1, crate::model::MatrixCell::UNREACHABLE);
        let route = plan_route(&index, &matrix, &[Category::MUSEUM]).unwrap();
        assert_eq!(route.stops[0].index, 1);
        assert!(!route.is_reachable());
    }

    #[test]
    fn mismatched_matrix_is_rejected() {
        let (index, _) = fixture();
        let small = CostMatrix::unreachable(2);
        let result = plan_route(&index, &small, &[Category::MUSEUM]);
        assert_eq!(
            result,
            Err(PlanError::IndexOutOfRange { index: 2, size: 2 })
        );
    }

    #[test]
    fn planning_is_repeatable() {
        let (index, matrix) = fixture();
        let targets = [Category::COFFEE_SHOP, Category::MUSEUM];
        let first = plan_route(&index, &matrix, &targets).unwrap();
        let second = plan_route(&index, &matrix, &targets).unwrap();
        assert_eq!(first, second);
    }
}

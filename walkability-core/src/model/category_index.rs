//! Category to point-index lookup

use hashbrown::HashMap;

use super::{Category, PointSet};
use crate::PointIndex;

/// Maps each category to the indices of the points carrying it.
///
/// Built in one pass over a [`PointSet`]; indices within a category are in
/// increasing order. Categories nobody carries resolve to an empty slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryIndex {
    index: HashMap<Category, Vec<PointIndex>>,
}

impl CategoryIndex {
    pub fn build(points: &PointSet) -> Self {
        let mut index: HashMap<Category, Vec<PointIndex>> = HashMap::new();
        for (idx, point) in points.iter().enumerate() {
            for category in point.categories() {
                index.entry(category.clone()).or_default().push(idx);
            }
        }
        Self { index }
    }

    /// Candidate points for `category`, possibly empty
    pub fn candidates(&self, category: &Category) -> &[PointIndex] {
        self.index.get(category).map(Vec::as_slice).unwrap_or_default()
    }

    /// Categories carried by at least one point
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.index.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PointOfInterest;
    use geo::Point;

    fn point_set() -> PointSet {
        let points = vec![
            PointOfInterest::new("Cafe", 0.0, 0.01, [Category::COFFEE_SHOP]).unwrap(),
            PointOfInterest::new(
                "Creamery",
                0.0,
                0.02,
                [Category::DESSERTS, Category::COFFEE_SHOP],
            )
            .unwrap(),
            PointOfInterest::new("Library", 0.0, 0.03, [Category::LIBRARY]).unwrap(),
        ];
        PointSet::new(Point::new(0.0, 0.0), &points)
    }

    #[test]
    fn lists_are_in_construction_order() {
        let index = CategoryIndex::build(&point_set());
        assert_eq!(index.candidates(&Category::HOME), &[0]);
        assert_eq!(index.candidates(&Category::COFFEE_SHOP), &[1, 2]);
        assert_eq!(index.candidates(&Category::DESSERTS), &[2]);
        assert_eq!(index.candidates(&Category::LIBRARY), &[3]);
    }

    #[test]
    fn unused_category_is_empty() {
        let index = CategoryIndex::build(&point_set());
        assert!(index.candidates(&Category::MUSEUM).is_empty());
        assert!(index.candidates(&Category::new("bubble_tea")).is_empty());
    }

    #[test]
    fn every_membership_appears_exactly_once() {
        let set = point_set();
        let index = CategoryIndex::build(&set);

        for category in index.categories() {
            let list = index.candidates(category);
            assert!(list.windows(2).all(|w| w[0] < w[1]));
            for &idx in list {
                assert!(set.get(idx).unwrap().has_category(category));
            }
        }
        for (idx, point) in set.iter().enumerate() {
            for category in point.categories() {
                let hits = index
                    .candidates(category)
                    .iter()
                    .filter(|&&i| i == idx)
                    .count();
                assert_eq!(hits, 1);
            }
        }
    }
}

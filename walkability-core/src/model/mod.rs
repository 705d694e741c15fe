//! Data model: points of interest, categories and walking costs

pub mod category;
pub mod category_index;
pub mod cost_matrix;
pub mod point;
pub mod point_set;

pub use category::{Category, CategoryInfo, CategoryRegistry};
pub use category_index::CategoryIndex;
pub use cost_matrix::{CostMatrix, MatrixCell};
pub use point::{LatLon, PointOfInterest, validate_coordinates};
pub use point_set::PointSet;

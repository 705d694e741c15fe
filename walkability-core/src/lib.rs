//! Walkability estimation over a precomputed walking cost matrix.
//!
//! Points of interest are tagged with categories. A route request is a
//! sequence of categories; the planner walks from home to the nearest point of
//! each requested category in turn and back home again, and reports the
//! average walking time per leg.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod providers;
pub mod routing;
pub mod session;

pub use error::Error;
pub use model::{
    Category, CategoryIndex, CategoryInfo, CategoryRegistry, CostMatrix, MatrixCell,
    PointOfInterest, PointSet,
};
pub use routing::{PlanError, RouteLeg, RouteResult, RouteStop, plan_route};
pub use session::{HomeAddress, HomeResolution, Walkability};

/// Position of a point inside a [`PointSet`] and row/column of the [`CostMatrix`]
pub type PointIndex = usize;
/// Walking duration in seconds
pub type Seconds = f64;
/// Walking distance in meters
pub type Meters = f64;

/// Index reserved for the home point
pub const HOME_INDEX: PointIndex = 0;

/// Home coordinate used when no usable home address is supplied (lat, lon)
pub const DEFAULT_HOME: (f64, f64) = (34.067_688_225_046_496, -118.442_123_650_349_9);

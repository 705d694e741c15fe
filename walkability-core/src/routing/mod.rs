mod planner;
mod result;
mod to_geojson;

pub use planner::{PlanError, plan_route};
pub use result::{RouteLeg, RouteResult, RouteStop};

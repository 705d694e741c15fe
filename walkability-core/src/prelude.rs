// Re-export key components
pub use crate::loading::{
    BatchLimits, Catalog, ProviderConfig, ProviderKind, WalkabilityConfig, build_cost_matrix,
    read_catalog,
};
pub use crate::model::{
    Category, CategoryIndex, CategoryInfo, CategoryRegistry, CostMatrix, LatLon, MatrixCell,
    PointOfInterest, PointSet,
};
pub use crate::providers::{
    DistanceMatrixProvider, Geocoder, GoogleMapsClient, ProviderError, StaticGeocoder,
    StraightLineProvider, TableProvider,
};
pub use crate::routing::{PlanError, RouteLeg, RouteResult, RouteStop, plan_route};
pub use crate::session::{HomeAddress, HomeResolution, Snapshot, Walkability};

pub use crate::Error;
pub use crate::{DEFAULT_HOME, HOME_INDEX};
pub use crate::{Meters, PointIndex, Seconds};

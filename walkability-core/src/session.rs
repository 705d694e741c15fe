//! Walkability session: point set, category index and cost matrix kept
//! together as one immutable snapshot.
//!
//! Planning reads the current snapshot without blocking writers for longer
//! than an `Arc` clone. Moving home builds a new snapshot off to the side
//! (refetching only the matrix cells that involve home) and swaps it in, so a
//! planner never sees a half-updated matrix.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use geo::Point;
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::loading::{
    BatchLimits, WalkabilityConfig, build_cost_matrix, read_catalog, refresh_home_cells,
};
use crate::model::{
    Category, CategoryIndex, CategoryRegistry, CostMatrix, PointOfInterest, PointSet,
    validate_coordinates,
};
use crate::providers::{DistanceMatrixProvider, Geocoder, NoGeocoder};
use crate::routing::{PlanError, RouteResult, plan_route};
use crate::{DEFAULT_HOME, Error};

/// Where home is, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HomeAddress {
    /// Free text resolved through the geocoder
    Text { address: String },
    Coordinates { lat: f64, lon: f64 },
}

impl HomeAddress {
    pub fn text(address: impl Into<String>) -> Self {
        Self::Text {
            address: address.into(),
        }
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::Coordinates { lat, lon }
    }
}

/// How the current home position was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HomeResolution {
    /// Address resolved by the geocoder
    Geocoded { address: String },
    /// Coordinates given directly
    Explicit,
    /// Nothing supplied; the default home is used
    Default,
    /// Something was supplied but could not be used; the default home is used
    Fallback { reason: String },
}

impl HomeResolution {
    /// True when a supplied home could not be used
    pub fn is_degraded(&self) -> bool {
        matches!(self, HomeResolution::Fallback { .. })
    }
}

/// Immutable state a route is planned against
#[derive(Debug)]
pub struct Snapshot {
    points: PointSet,
    index: CategoryIndex,
    matrix: CostMatrix,
    home: HomeResolution,
}

impl Snapshot {
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    pub fn home_resolution(&self) -> &HomeResolution {
        &self.home
    }

    /// # Errors
    ///
    /// See [`plan_route`].
    pub fn plan(&self, targets: &[Category]) -> Result<RouteResult, PlanError> {
        plan_route(&self.index, &self.matrix, targets)
    }
}

/// A walkability session over one neighborhood
pub struct Walkability {
    state: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
    registry: CategoryRegistry,
    geocoder: Arc<dyn Geocoder>,
    matrix_provider: Arc<dyn DistanceMatrixProvider>,
    limits: BatchLimits,
}

/// Collects the inputs of a [`Walkability`] session
pub struct WalkabilityBuilder {
    points: Vec<PointOfInterest>,
    home: Option<HomeAddress>,
    registry: CategoryRegistry,
    geocoder: Arc<dyn Geocoder>,
    matrix_provider: Arc<dyn DistanceMatrixProvider>,
    limits: BatchLimits,
}

impl WalkabilityBuilder {
    #[must_use]
    pub fn points(mut self, points: Vec<PointOfInterest>) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn home(mut self, home: Option<HomeAddress>) -> Self {
        self.home = home;
        self
    }

    #[must_use]
    pub fn geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: CategoryRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolves home, builds the point set and category index, and fetches
    /// the full cost matrix.
    ///
    /// Never fails: an unusable home falls back to [`DEFAULT_HOME`] (see
    /// [`Walkability::home_resolution`]) and unavailable matrix cells are
    /// stored as unreachable.
    pub fn build(self) -> Walkability {
        let (home, resolution) = match &self.home {
            None => (default_home(), HomeResolution::Default),
            Some(address) => match resolve_home(self.geocoder.as_ref(), address) {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!("Home address unusable, falling back to default home: {e}");
                    (
                        default_home(),
                        HomeResolution::Fallback {
                            reason: e.to_string(),
                        },
                    )
                }
            },
        };

        let points = PointSet::new(home, &self.points);
        let index = CategoryIndex::build(&points);
        let matrix =
            build_cost_matrix(self.matrix_provider.as_ref(), &points.coordinates(), self.limits);

        info!(
            "Walkability session ready: {} points, {} categories in use",
            points.len(),
            index.categories().count()
        );

        Walkability {
            state: RwLock::new(Arc::new(Snapshot {
                points,
                index,
                matrix,
                home: resolution,
            })),
            writer: Mutex::new(()),
            registry: self.registry,
            geocoder: self.geocoder,
            matrix_provider: self.matrix_provider,
            limits: self.limits,
        }
    }
}

impl Walkability {
    /// Starts a session that fetches walking costs from `matrix_provider`.
    /// The geocoder defaults to none, the registry to the built-in categories.
    pub fn builder(matrix_provider: Arc<dyn DistanceMatrixProvider>) -> WalkabilityBuilder {
        WalkabilityBuilder {
            points: Vec::new(),
            home: None,
            registry: CategoryRegistry::builtin(),
            geocoder: Arc::new(NoGeocoder),
            matrix_provider,
            limits: BatchLimits::default(),
        }
    }

    /// Builds a session from configuration: providers, catalog and home.
    ///
    /// # Errors
    ///
    /// Fails when no catalog is configured, the catalog cannot be read, or
    /// the providers cannot be created.
    pub fn from_config(config: &WalkabilityConfig) -> Result<Self, Error> {
        let catalog_path = config
            .catalog
            .as_ref()
            .ok_or_else(|| Error::InvalidData("No point-of-interest catalog configured".to_string()))?;
        let catalog = read_catalog(catalog_path, CategoryRegistry::builtin())?;
        let (geocoder, matrix_provider) = config.provider.build_providers()?;

        Ok(Self::builder(matrix_provider)
            .geocoder(geocoder)
            .registry(catalog.registry)
            .points(catalog.points)
            .home(config.home.clone())
            .limits(config.provider.batch_limits())
            .build())
    }

    /// Current state; stays valid even if home moves afterwards
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn home_resolution(&self) -> HomeResolution {
        self.snapshot().home.clone()
    }

    /// Plans one route against the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`plan_route`].
    pub fn plan(&self, targets: &[Category]) -> Result<RouteResult, PlanError> {
        self.snapshot().plan(targets)
    }

    /// Plans several routes in parallel against the same snapshot
    pub fn plan_many(&self, routes: &[Vec<Category>]) -> Vec<Result<RouteResult, PlanError>> {
        let snapshot = self.snapshot();
        routes
            .par_iter()
            .map(|targets| snapshot.plan(targets))
            .collect()
    }

    /// Moves home and refreshes the walking costs that involve it.
    ///
    /// Only row 0 and column 0 of the matrix are refetched. The new state is
    /// swapped in at once; on error the session is left unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCoordinates`] for out-of-range coordinates and
    /// [`Error::HomeResolution`] when the address cannot be geocoded.
    pub fn set_home(&self, address: &HomeAddress) -> Result<HomeResolution, Error> {
        let (home, resolution) = resolve_home(self.geocoder.as_ref(), address)?;

        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot();

        let points = current.points.with_home(home);
        let mut matrix = current.matrix.clone();
        refresh_home_cells(
            self.matrix_provider.as_ref(),
            &points.coordinates(),
            &mut matrix,
            self.limits,
        );

        let next = Arc::new(Snapshot {
            points,
            // Category membership does not depend on home's position
            index: current.index.clone(),
            matrix,
            home: resolution.clone(),
        });
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;

        info!("Home moved to ({}, {})", home.y(), home.x());
        Ok(resolution)
    }
}

fn default_home() -> Point<f64> {
    let (lat, lon) = DEFAULT_HOME;
    Point::new(lon, lat)
}

fn resolve_home(
    geocoder: &dyn Geocoder,
    address: &HomeAddress,
) -> Result<(Point<f64>, HomeResolution), Error> {
    match address {
        HomeAddress::Coordinates { lat, lon } => {
            Ok((validate_coordinates(*lat, *lon)?, HomeResolution::Explicit))
        }
        HomeAddress::Text { address } => {
            let location = geocoder
                .geocode(address)
                .map_err(Error::HomeResolution)?;
            let point = validate_coordinates(location.y(), location.x())?;
            Ok((
                point,
                HomeResolution::Geocoded {
                    address: address.clone(),
                },
            ))
        }
    }
}

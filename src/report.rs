//! Human and machine readable output of planned routes.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use geojson::FeatureCollection;
use serde::Serialize;
use walkability_core::prelude::*;

#[derive(Debug, Serialize)]
pub struct StopReport {
    pub index: PointIndex,
    pub name: String,
    pub category: Category,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct PlannedRoute {
    pub categories: Vec<Category>,
    pub stops: Vec<StopReport>,
    pub legs: Vec<RouteLeg>,
    pub steps: usize,
    pub total_duration: Seconds,
    pub total_distance: Meters,
    pub average_duration: Seconds,
    pub average_distance: Meters,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RouteReport {
    Planned(PlannedRoute),
    Failed {
        categories: Vec<Category>,
        error: String,
    },
}

impl RouteReport {
    pub fn is_planned(&self) -> bool {
        matches!(self, RouteReport::Planned(_))
    }
}

/// Everything printed by one run
#[derive(Debug, Serialize)]
pub struct Report {
    pub home: LatLon,
    pub home_resolution: HomeResolution,
    pub routes: Vec<RouteReport>,
}

impl Report {
    pub fn new(
        snapshot: &Snapshot,
        routes: &[Vec<Category>],
        results: &[Result<RouteResult, PlanError>],
    ) -> Self {
        let routes = routes
            .iter()
            .zip(results)
            .map(|(categories, result)| match result {
                Ok(route) => RouteReport::Planned(planned(snapshot.points(), categories, route)),
                Err(e) => RouteReport::Failed {
                    categories: categories.clone(),
                    error: e.to_string(),
                },
            })
            .collect();

        Self {
            home: snapshot.points().home().geometry.into(),
            home_resolution: snapshot.home_resolution().clone(),
            routes,
        }
    }

    pub fn all_planned(&self) -> bool {
        self.routes.iter().all(RouteReport::is_planned)
    }
}

fn planned(points: &PointSet, categories: &[Category], route: &RouteResult) -> PlannedRoute {
    let stops = route
        .stops
        .iter()
        .filter_map(|stop| {
            let point = points.get(stop.index)?;
            Some(StopReport {
                index: stop.index,
                name: point.name.clone(),
                category: stop.category.clone(),
                lat: point.lat(),
                lon: point.lon(),
            })
        })
        .collect();

    PlannedRoute {
        categories: categories.to_vec(),
        stops,
        legs: route.legs.clone(),
        steps: route.steps(),
        total_duration: route.total_duration,
        total_distance: route.total_distance,
        average_duration: route.average_duration(),
        average_distance: route.average_distance(),
    }
}

fn route_label(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "(home only)".to_string();
    }
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn minutes(seconds: Seconds) -> String {
    if seconds.is_finite() {
        format!("{:.1} min", seconds / 60.0)
    } else {
        "unreachable".to_string()
    }
}

fn meters(distance: Meters) -> String {
    if distance.is_finite() {
        format!("{distance:.0} m")
    } else {
        "unreachable".to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Home: {:.6}, {:.6} ({})",
            self.home.lat,
            self.home.lon,
            match &self.home_resolution {
                HomeResolution::Geocoded { address } => format!("geocoded from '{address}'"),
                HomeResolution::Explicit => "explicit coordinates".to_string(),
                HomeResolution::Default => "default".to_string(),
                HomeResolution::Fallback { reason } => format!("default, {reason}"),
            }
        )?;

        for route in &self.routes {
            writeln!(f)?;
            match route {
                RouteReport::Planned(route) => {
                    writeln!(f, "Route: {}", route_label(&route.categories))?;
                    for (stop, leg) in route.stops.iter().zip(&route.legs) {
                        writeln!(
                            f,
                            "  {:<24} {:<16} {:>12} {:>10}",
                            stop.name,
                            stop.category.as_str(),
                            minutes(leg.duration),
                            meters(leg.distance)
                        )?;
                    }
                    if let Some(last) = route.legs.last() {
                        writeln!(
                            f,
                            "  {:<24} {:<16} {:>12} {:>10}",
                            "Home",
                            "home",
                            minutes(last.duration),
                            meters(last.distance)
                        )?;
                    }
                    writeln!(
                        f,
                        "  Total {} / {} over {} legs, average {} / {}",
                        minutes(route.total_duration),
                        meters(route.total_distance),
                        route.steps,
                        minutes(route.average_duration),
                        meters(route.average_distance)
                    )?;
                }
                RouteReport::Failed { categories, error } => {
                    writeln!(f, "Route: {}", route_label(categories))?;
                    writeln!(f, "  Failed: {error}")?;
                }
            }
        }
        Ok(())
    }
}

/// Collects every planned route into one feature collection; each feature
/// carries the position of its route in the `route` property.
pub fn routes_to_geojson(
    points: &PointSet,
    results: &[Result<RouteResult, PlanError>],
) -> FeatureCollection {
    let features = results
        .iter()
        .enumerate()
        .filter_map(|(i, result)| Some((i, result.as_ref().ok()?)))
        .flat_map(|(i, route)| {
            route.to_geojson(points).features.into_iter().map(move |mut feature| {
                feature
                    .properties
                    .get_or_insert_with(serde_json::Map::new)
                    .insert("route".to_string(), serde_json::json!(i));
                feature
            })
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

pub fn write_geojson(
    path: &Path,
    points: &PointSet,
    results: &[Result<RouteResult, PlanError>],
) -> anyhow::Result<()> {
    let collection = routes_to_geojson(points, results);
    let text = serde_json::to_string_pretty(&collection)?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write GeoJSON '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo::Point;

    use super::*;

    fn session() -> Walkability {
        let coordinates = vec![
            Point::new(0.0, 0.0),
            Point::new(0.01, 0.0),
            Point::new(0.02, 0.0),
        ];
        let durations = vec![
            vec![0.0, 120.0, 60.0],
            vec![120.0, 0.0, 30.0],
            vec![60.0, 30.0, 0.0],
        ];
        let distances = vec![
            vec![0.0, 150.0, 80.0],
            vec![150.0, 0.0, 40.0],
            vec![80.0, 40.0, 0.0],
        ];
        let provider = TableProvider::new(
            coordinates,
            CostMatrix::from_rows(&distances, &durations).unwrap(),
        );

        Walkability::builder(Arc::new(provider))
            .points(vec![
                PointOfInterest::new("Powell Library", 0.0, 0.01, [Category::LIBRARY]).unwrap(),
                PointOfInterest::new("Kerckhoff Coffee", 0.0, 0.02, [Category::COFFEE_SHOP])
                    .unwrap(),
            ])
            .home(Some(HomeAddress::coordinates(0.0, 0.0)))
            .build()
    }

    fn report(routes: &[Vec<Category>]) -> (Walkability, Report) {
        let session = session();
        let results = session.plan_many(routes);
        let report = Report::new(&session.snapshot(), routes, &results);
        (session, report)
    }

    #[test]
    fn text_report_lists_stops_and_totals() {
        let (_, report) = report(&[vec![Category::COFFEE_SHOP, Category::LIBRARY]]);
        let text = report.to_string();

        assert!(text.contains("explicit coordinates"));
        assert!(text.contains("coffee_shop -> library"));
        assert!(text.contains("Kerckhoff Coffee"));
        // 60 + 30 + 120 seconds over three legs
        assert!(text.contains("Total 3.5 min / 270 m over 3 legs"));
        assert!(report.all_planned());
    }

    #[test]
    fn failed_route_is_reported_not_fatal() {
        let (_, report) = report(&[vec![Category::MUSEUM], vec![Category::LIBRARY]]);

        assert!(!report.all_planned());
        assert!(report.routes[1].is_planned());
        assert!(report.to_string().contains("Failed: No point carries category 'museum'"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["routes"][0]["categories"][0], "museum");
        assert!(json["routes"][0]["error"].is_string());
        assert_eq!(json["routes"][1]["stops"][0]["name"], "Powell Library");
        assert_eq!(json["home_resolution"]["status"], "explicit");
    }

    #[test]
    fn geojson_tags_features_with_their_route() {
        let session = session();
        let routes = vec![vec![Category::LIBRARY], vec![Category::MUSEUM], vec![]];
        let results = session.plan_many(&routes);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.geojson");
        write_geojson(&path, session.snapshot().points(), &results).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let features = json["features"].as_array().unwrap();
        // library: one stop and two legs; empty route: one leg
        assert_eq!(features.len(), 4);
        assert_eq!(features[0]["properties"]["route"], 0);
        assert_eq!(features[3]["properties"]["route"], 2);
    }
}

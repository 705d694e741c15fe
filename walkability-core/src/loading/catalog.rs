//! Reading point-of-interest catalogs from JSON or CSV files

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::Error;
use crate::model::{Category, CategoryInfo, CategoryRegistry, PointOfInterest};

/// Points read from a catalog together with the registry that validated them
#[derive(Debug, Clone)]
pub struct Catalog {
    pub points: Vec<PointOfInterest>,
    pub registry: CategoryRegistry,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<CategoryInfo>,
    points: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    name: String,
    lat: f64,
    lon: f64,
    categories: Vec<String>,
}

#[derive(Deserialize)]
struct CsvEntry {
    name: String,
    lat: f64,
    lon: f64,
    categories: String,
}

/// Reads a catalog, choosing the format from the file extension
/// (`.csv` for CSV, anything else is parsed as JSON).
///
/// # Errors
///
/// I/O and parse errors, unknown categories, invalid coordinates.
pub fn read_catalog(path: &Path, registry: CategoryRegistry) -> Result<Catalog, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open catalog '{}': {}", path.display(), e),
        )
    })?;

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let catalog = if is_csv {
        read_catalog_csv(file, registry)?
    } else {
        read_catalog_json(file, registry)?
    };

    info!(
        "Loaded {} points of interest from {}",
        catalog.points.len(),
        path.display()
    );
    Ok(catalog)
}

/// Parses a JSON catalog. Categories declared in its `categories` block are
/// added to `registry` before the points are validated.
///
/// # Errors
///
/// See [`read_catalog`].
pub fn read_catalog_json<R: Read>(
    reader: R,
    mut registry: CategoryRegistry,
) -> Result<Catalog, Error> {
    let file: CatalogFile = serde_json::from_reader(reader)?;

    // Declared ids go through the same normalization as point references
    for info in file.categories {
        registry.register(Category::new(info.id.as_str()), info.label);
    }

    let points = file
        .points
        .into_iter()
        .map(|entry| to_point(&registry, entry.name, entry.lat, entry.lon, &entry.categories))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalog { points, registry })
}

/// Parses a CSV catalog with the header `name,lat,lon,categories`;
/// categories are separated by `;`.
///
/// # Errors
///
/// See [`read_catalog`].
pub fn read_catalog_csv<R: Read>(reader: R, registry: CategoryRegistry) -> Result<Catalog, Error> {
    let mut points = Vec::new();
    for row in csv::Reader::from_reader(reader).deserialize::<CsvEntry>() {
        let entry = row?;
        let categories: Vec<&str> = entry
            .categories
            .split(';')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        points.push(to_point(
            &registry,
            entry.name,
            entry.lat,
            entry.lon,
            &categories,
        )?);
    }

    Ok(Catalog { points, registry })
}

fn to_point<S: AsRef<str>>(
    registry: &CategoryRegistry,
    name: String,
    lat: f64,
    lon: f64,
    categories: &[S],
) -> Result<PointOfInterest, Error> {
    let categories = categories
        .iter()
        .map(|c| registry.resolve(c.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    if categories.contains(&Category::HOME) {
        return Err(Error::InvalidData(format!(
            "Point '{name}' uses the reserved 'home' category"
        )));
    }

    PointOfInterest::new(name, lat, lon, categories)
}

//! Points of interest

use geo::Point;
use serde::{Deserialize, Serialize};

use super::Category;
use crate::Error;

/// A named, geolocated place tagged with one or more categories
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    /// Display name, not required to be unique
    pub name: String,
    /// x = longitude, y = latitude
    pub geometry: Point<f64>,
    categories: Vec<Category>,
}

impl PointOfInterest {
    /// Creates a point from a name, coordinates and categories.
    ///
    /// Duplicate categories are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCoordinates`] for out-of-range coordinates
    /// and [`Error::InvalidData`] when no category is given.
    pub fn new(
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        categories: impl IntoIterator<Item = Category>,
    ) -> Result<Self, Error> {
        let geometry = validate_coordinates(lat, lon)?;
        let name = name.into();

        let mut unique: Vec<Category> = Vec::new();
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        if unique.is_empty() {
            return Err(Error::InvalidData(format!(
                "Point '{name}' has no categories"
            )));
        }

        Ok(Self {
            name,
            geometry,
            categories: unique,
        })
    }

    pub(crate) fn home(geometry: Point<f64>) -> Self {
        Self {
            name: "Home".to_string(),
            geometry,
            categories: vec![Category::HOME],
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn has_category(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Plain latitude/longitude pair used on serialization boundaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<Point<f64>> for LatLon {
    fn from(point: Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

/// Checks that latitude and longitude are finite and in range and
/// returns them as a `geo::Point` (x = lon, y = lat).
///
/// # Errors
///
/// [`Error::InvalidCoordinates`] when either value is out of range.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<Point<f64>, Error> {
    let valid = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);
    if valid {
        Ok(Point::new(lon, lat))
    } else {
        Err(Error::InvalidCoordinates { lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_lon_as_x_and_lat_as_y() {
        let poi = PointOfInterest::new("Library", 34.07, -118.44, [Category::LIBRARY]).unwrap();
        assert_eq!(poi.geometry.x(), -118.44);
        assert_eq!(poi.lat(), 34.07);
    }

    #[test]
    fn keeps_multiple_categories_without_duplicates() {
        let poi = PointOfInterest::new(
            "Diner",
            0.0,
            0.0,
            [Category::RESTAURANT, Category::FAST_FOOD, Category::RESTAURANT],
        )
        .unwrap();
        assert_eq!(poi.categories(), &[Category::RESTAURANT, Category::FAST_FOOD]);
        assert!(poi.has_category(&Category::FAST_FOOD));
    }

    #[test]
    fn rejects_points_without_categories() {
        let result = PointOfInterest::new("Nowhere", 0.0, 0.0, Vec::<Category>::new());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
    }
}

use super::geojson::{Geometry, Position};
use geo::prelude::*;
use geo_types::{MultiPoint, Point, Rect};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoCoordinate { lat, lon }
    }
}

/// Positions are stored as `[lon, lat, ..]`, missing components become NaN.
impl From<&Position> for GeoCoordinate {
    fn from(position: &Position) -> Self {
        let lon = position.get(0).copied().unwrap_or(f64::NAN);
        let lat = position.get(1).copied().unwrap_or(f64::NAN);
        GeoCoordinate { lat, lon }
    }
}

impl From<GeoCoordinate> for Point<f64> {
    fn from(coordinate: GeoCoordinate) -> Self {
        Point::new(coordinate.lon, coordinate.lat)
    }
}

pub fn to_coordinates(positions: &[Position]) -> Vec<GeoCoordinate> {
    positions.iter().map(GeoCoordinate::from).collect()
}

/// Great-circle length in kilometers.
pub trait Length {
    fn length(&self) -> f64;
}

impl Length for [GeoCoordinate] {
    fn length(&self) -> f64 {
        self.iter()
            .map(|&coordinate| Point::from(coordinate))
            .tuple_windows()
            .map(|(a, b)| a.haversine_distance(&b) / 1000.)
            .fold(0., |total, km| total + km)
    }
}

impl Length for Vec<GeoCoordinate> {
    fn length(&self) -> f64 {
        self.as_slice().length()
    }
}

/// Only paths have a length. The parts of a `MultiLineString` are measured
/// separately, the gaps between them don't count.
impl Length for Geometry {
    fn length(&self) -> f64 {
        match self {
            Geometry::LineString { coordinates } => to_coordinates(coordinates).length(),
            Geometry::MultiLineString { coordinates } => coordinates
                .iter()
                .map(|line| to_coordinates(line).length())
                .fold(0., |total, km| total + km),
            _ => 0.,
        }
    }
}

pub fn format_km(length: f64) -> String {
    format!("{:.2}", length)
}

/// Total length of a path in km, formatted with two decimals.
///
/// Segments are measured with the haversine formula on a sphere with the
/// mean earth radius (6371.0088 km). Rounding happens once, on the total.
///
/// # Example
///
/// ```
/// use kml_summary::geo::{total_length, GeoCoordinate};
///
/// let path = [GeoCoordinate::new(0., 0.), GeoCoordinate::new(0., 1.)];
/// let km: f64 = total_length(&path).parse().unwrap();
/// assert!((km - 111.19).abs() < 0.5);
/// assert_eq!(total_length(&path[..1]), "0.00");
/// ```
pub fn total_length(coordinates: &[GeoCoordinate]) -> String {
    format_km(coordinates.length())
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub e: f64,
    pub n: f64,
    pub s: f64,
    pub w: f64,
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Bounds {
            e: rect.max().x,
            n: rect.max().y,
            s: rect.min().y,
            w: rect.min().x,
        }
    }
}

impl Bounds {
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new((self.n + self.s) / 2., (self.e + self.w) / 2.)
    }
}

pub fn get_bounds(coordinates: &[GeoCoordinate]) -> Option<Bounds> {
    let points: Vec<Point<f64>> = coordinates
        .iter()
        .filter(|c| c.lat.is_finite() && c.lon.is_finite())
        .map(|&c| c.into())
        .collect();
    let multi_points: MultiPoint<f64> = points.into();
    let rect = multi_points.bounding_rect()?;
    Some(rect.into())
}

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A GeoJSON position, `[lon, lat]` with an optional altitude.
pub type Position = Vec<f64>;

pub type Properties = Map<String, Value>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
    Unknown,
}

impl GeometryKind {
    pub fn name(self) -> &'static str {
        use GeometryKind::*;

        match self {
            Point => "Point",
            MultiPoint => "MultiPoint",
            LineString => "LineString",
            MultiLineString => "MultiLineString",
            Polygon => "Polygon",
            MultiPolygon => "MultiPolygon",
            GeometryCollection => "GeometryCollection",
            Unknown => "unknown",
        }
    }

    /// Paths are the kinds whose name mentions "Line".
    pub fn is_line_like(self) -> bool {
        self.name().contains("Line")
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point { .. } => GeometryKind::Point,
            Geometry::MultiPoint { .. } => GeometryKind::MultiPoint,
            Geometry::LineString { .. } => GeometryKind::LineString,
            Geometry::MultiLineString { .. } => GeometryKind::MultiLineString,
            Geometry::Polygon { .. } => GeometryKind::Polygon,
            Geometry::MultiPolygon { .. } => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection { .. } => GeometryKind::GeometryCollection,
            Geometry::Unknown => GeometryKind::Unknown,
        }
    }

    /// All positions of the geometry, flattened in document order.
    pub fn positions(&self) -> Vec<&Position> {
        match self {
            Geometry::Point { coordinates } => vec![coordinates],
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().collect()
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().flatten().collect()
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().collect()
            }
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(Geometry::positions).collect()
            }
            Geometry::Unknown => vec![],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
enum FeatureTag {
    Feature,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
enum FeatureCollectionTag {
    FeatureCollection,
}

/// Unrecognized geometries have no GeoJSON form and are written as `null`.
fn serialize_geometry<S: Serializer>(
    geometry: &Option<Geometry>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match geometry {
        None | Some(Geometry::Unknown) => serializer.serialize_none(),
        Some(geometry) => serializer.serialize_some(geometry),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    tag: FeatureTag,
    #[serde(default, serialize_with = "serialize_geometry")]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Properties) -> Self {
        Feature {
            tag: FeatureTag::Feature,
            geometry,
            properties: Some(properties),
        }
    }

    /// Features without a (recognized) geometry are of kind `Unknown`.
    pub fn kind(&self) -> GeometryKind {
        self.geometry
            .as_ref()
            .map_or(GeometryKind::Unknown, Geometry::kind)
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.as_ref()?.get("name")?.as_str()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    tag: FeatureCollectionTag,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            tag: FeatureCollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        FeatureCollection::new(vec![])
    }
}

use super::geo::{get_bounds, to_coordinates, Bounds, GeoCoordinate};
use super::geojson::{Feature, FeatureCollection, Geometry};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CENTER: GeoCoordinate = GeoCoordinate {
    lat: 20.5937,
    lon: 78.9629,
};
pub const DEFAULT_ZOOM: u8 = 5;

/// Something to draw on a map. Coordinates are in `(lat, lon)` order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Overlay {
    Marker {
        position: GeoCoordinate,
    },
    Polyline {
        paths: Vec<Vec<GeoCoordinate>>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: GeoCoordinate,
    pub zoom: u8,
    pub bounds: Option<Bounds>,
}

fn get_overlay(feature: &Feature) -> Option<Overlay> {
    let overlay = match feature.geometry.as_ref()? {
        Geometry::Point { coordinates } => Overlay::Marker {
            position: coordinates.into(),
        },
        Geometry::LineString { coordinates } => Overlay::Polyline {
            paths: vec![to_coordinates(coordinates)],
        },
        Geometry::MultiLineString { coordinates } => Overlay::Polyline {
            paths: coordinates.iter().map(|line| to_coordinates(line)).collect(),
        },
        _ => return None,
    };
    Some(overlay)
}

/// Markers for points and polylines for line-like features, in collection
/// order. Other geometries are not drawn.
pub fn overlays(collection: &FeatureCollection) -> Vec<Overlay> {
    collection.iter().filter_map(get_overlay).collect()
}

/// Where to point a map that shows the whole collection.
pub fn map_view(collection: &FeatureCollection) -> MapView {
    let coordinates: Vec<GeoCoordinate> = collection
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .flat_map(Geometry::positions)
        .map(GeoCoordinate::from)
        .collect();
    let bounds = get_bounds(&coordinates);
    let center = bounds.map_or(DEFAULT_CENTER, |bounds| bounds.center());
    MapView {
        center,
        zoom: DEFAULT_ZOOM,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{feature, line, point};

    #[test]
    fn overlays_swap_positions() {
        let collection = FeatureCollection::new(vec![
            point(13.4, 52.5),
            line(&[(9., 50.), (10., 51.)]),
            feature(Some(Geometry::Polygon {
                coordinates: vec![vec![vec![0., 0.], vec![1., 0.], vec![0., 0.]]],
            })),
            feature(None),
        ]);
        let original = collection.clone();
        let overlays = overlays(&collection);
        assert_eq!(
            overlays,
            vec![
                Overlay::Marker {
                    position: GeoCoordinate::new(52.5, 13.4)
                },
                Overlay::Polyline {
                    paths: vec![vec![
                        GeoCoordinate::new(50., 9.),
                        GeoCoordinate::new(51., 10.)
                    ]]
                },
            ]
        );
        assert_eq!(collection, original);
    }

    #[test]
    fn multi_line_string_overlay() {
        let collection = FeatureCollection::new(vec![feature(Some(Geometry::MultiLineString {
            coordinates: vec![vec![vec![0., 1.], vec![2., 3.]], vec![vec![4., 5.]]],
        }))]);
        match &overlays(&collection)[0] {
            Overlay::Polyline { paths } => {
                assert_eq!(paths.len(), 2);
                assert_eq!(paths[1], vec![GeoCoordinate::new(5., 4.)]);
            }
            other => panic!("expected polyline, got {:?}", other),
        }
    }

    #[test]
    fn serialize_marker() {
        let overlay = Overlay::Marker {
            position: GeoCoordinate::new(52.5, 13.4),
        };
        let json = serde_json::to_string(&overlay).unwrap();
        assert_eq!(
            json,
            r#"{"type":"marker","position":{"lat":52.5,"lon":13.4}}"#
        );
    }

    #[test]
    fn map_view_of_empty_collection() {
        let view = map_view(&FeatureCollection::default());
        assert_eq!(view.center, DEFAULT_CENTER);
        assert_eq!(view.zoom, DEFAULT_ZOOM);
        assert!(view.bounds.is_none());
    }

    #[test]
    fn map_view_covers_all_geometries() {
        let collection = FeatureCollection::new(vec![
            point(5., 49.),
            line(&[(6., 50.), (7., 49.)]),
            feature(None),
        ]);
        let view = map_view(&collection);
        let reference_bounds = Bounds {
            e: 7.,
            n: 50.,
            s: 49.,
            w: 5.,
        };
        assert_eq!(view.bounds, Some(reference_bounds));
        assert_eq!(view.center, GeoCoordinate::new(49.5, 6.));
    }
}

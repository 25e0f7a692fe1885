use super::geojson::{Feature, Geometry, Properties};

pub fn feature(geometry: Option<Geometry>) -> Feature {
    Feature::new(geometry, Properties::new())
}

pub fn point(lon: f64, lat: f64) -> Feature {
    let coordinates = vec![lon, lat];
    feature(Some(Geometry::Point { coordinates }))
}

pub fn line(positions: &[(f64, f64)]) -> Feature {
    let coordinates = positions.iter().map(|&(lon, lat)| vec![lon, lat]).collect();
    feature(Some(Geometry::LineString { coordinates }))
}

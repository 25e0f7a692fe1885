//! Conversion of KML documents into GeoJSON feature collections.
//!
//! Every `Placemark` with a geometry becomes a feature. Nested `Document` and `Folder`
//! elements are flattened, element names are compared without their
//! namespace prefix (`kml:Point` and `Point` are the same, as are
//! `gx:Track` and `Track`).

use super::error::{Error, Result};
use super::geojson::{Feature, FeatureCollection, Geometry, Position, Properties};
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;

const TEXT_PROPERTIES: [&str; 4] = ["name", "description", "styleUrl", "address"];

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn new(start: &BytesStart) -> std::result::Result<Self, quick_xml::Error> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = vec![];
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text fragments (including CDATA) joined as they appear, trimmed once.
    fn text(&self) -> &str {
        self.text.trim()
    }

    /// Collects the outermost descendants that satisfy `matches`, in
    /// document order. Matching elements are not searched any further.
    fn find_all<'a>(&'a self, matches: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        for child in self.children.iter() {
            if matches(child) {
                found.push(child);
            } else {
                child.find_all(matches, found);
            }
        }
    }
}

fn xml_error(reader: &Reader<&[u8]>, source: quick_xml::Error) -> Error {
    Error::Xml {
        position: reader.error_position() as u64,
        source,
    }
}

fn read_tree(kml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(kml);
    reader.config_mut().trim_text(false);

    let mut stack = vec![Element::default()];
    loop {
        let event = reader
            .read_event()
            .map_err(|source| xml_error(&reader, source))?;
        match event {
            Event::Start(start) => {
                let element = Element::new(&start).map_err(|source| xml_error(&reader, source))?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = Element::new(&start).map_err(|source| xml_error(&reader, source))?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(element) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(element);
                        }
                    }
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|source| xml_error(&reader, source))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&bytes));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // unclosed elements are folded into their parents
    while stack.len() > 1 {
        if let Some(element) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(element);
            }
        }
    }
    Ok(stack.pop().unwrap_or_default())
}

fn parse_position(tuple: &str) -> Position {
    tuple
        .split(',')
        .map(|value| value.trim().parse().unwrap_or(f64::NAN))
        .collect()
}

/// Parses whitespace separated `lon,lat[,alt]` tuples.
fn parse_coordinates(text: &str) -> Vec<Position> {
    text.split_whitespace().map(parse_position).collect()
}

fn coordinates_of(element: &Element) -> Vec<Position> {
    element
        .child("coordinates")
        .map(|coordinates| parse_coordinates(coordinates.text()))
        .unwrap_or_default()
}

fn track_coordinates(track: &Element) -> Vec<Position> {
    track
        .children_named("coord")
        .map(|coord| {
            coord
                .text()
                .split_whitespace()
                .map(|value| value.parse().unwrap_or(f64::NAN))
                .collect()
        })
        .collect()
}

fn is_geometry(element: &Element) -> bool {
    matches!(
        element.name.as_str(),
        "Point" | "LineString" | "Polygon" | "Track"
    )
}

fn get_geometry(element: &Element) -> Option<Geometry> {
    let geometry = match element.name.as_str() {
        "Point" => {
            let coordinates = coordinates_of(element).into_iter().next()?;
            Geometry::Point { coordinates }
        }
        "LineString" => Geometry::LineString {
            coordinates: coordinates_of(element),
        },
        "Track" => Geometry::LineString {
            coordinates: track_coordinates(element),
        },
        "Polygon" => {
            let mut rings = vec![];
            element.find_all(&|e: &Element| e.name == "LinearRing", &mut rings);
            let coordinates = rings.into_iter().map(coordinates_of).collect();
            Geometry::Polygon { coordinates }
        }
        _ => return None,
    };
    if geometry.positions().is_empty() {
        return None;
    }
    Some(geometry)
}

/// Several geometries of the same kind are merged into the matching multi
/// geometry, mixed ones end up in a collection.
fn combine(mut geometries: Vec<Geometry>) -> Option<Geometry> {
    if geometries.len() < 2 {
        return geometries.pop();
    }

    let mut points = vec![];
    let mut lines = vec![];
    let mut polygons = vec![];
    for geometry in geometries.iter() {
        match geometry {
            Geometry::Point { coordinates } => points.push(coordinates.clone()),
            Geometry::LineString { coordinates } => lines.push(coordinates.clone()),
            Geometry::Polygon { coordinates } => polygons.push(coordinates.clone()),
            _ => {}
        }
    }

    let len = geometries.len();
    let geometry = if points.len() == len {
        Geometry::MultiPoint {
            coordinates: points,
        }
    } else if lines.len() == len {
        Geometry::MultiLineString { coordinates: lines }
    } else if polygons.len() == len {
        Geometry::MultiPolygon {
            coordinates: polygons,
        }
    } else {
        Geometry::GeometryCollection { geometries }
    };
    Some(geometry)
}

fn get_properties(placemark: &Element) -> Properties {
    let mut properties = Properties::new();
    for &name in TEXT_PROPERTIES.iter() {
        if let Some(element) = placemark.child(name) {
            properties.insert(name.into(), Value::String(element.text().into()));
        }
    }

    if let Some(when) = placemark
        .child("TimeStamp")
        .and_then(|timestamp| timestamp.child("when"))
    {
        properties.insert("timestamp".into(), Value::String(when.text().into()));
    }

    if let Some(extended_data) = placemark.child("ExtendedData") {
        for data in extended_data.children_named("Data") {
            if let Some(name) = data.attribute("name") {
                let value = data.child("value").map_or("", Element::text);
                properties.insert(name.into(), Value::String(value.into()));
            }
        }
        for schema_data in extended_data.children_named("SchemaData") {
            for simple_data in schema_data.children_named("SimpleData") {
                if let Some(name) = simple_data.attribute("name") {
                    properties.insert(name.into(), Value::String(simple_data.text().into()));
                }
            }
        }
    }
    properties
}

fn track_times(track: &Element) -> Value {
    track
        .children_named("when")
        .map(|when| Value::String(when.text().into()))
        .collect()
}

/// Timestamps of track points, an array per track when there are several.
fn get_coord_times(elements: &[&Element]) -> Option<Value> {
    let tracks: Vec<&Element> = elements
        .iter()
        .copied()
        .filter(|element| element.name == "Track")
        .collect();
    if !tracks.iter().any(|track| track.child("when").is_some()) {
        return None;
    }
    match tracks.as_slice() {
        [track] => Some(track_times(track)),
        _ => Some(tracks.into_iter().map(track_times).collect()),
    }
}

fn get_feature(placemark: &Element) -> Option<Feature> {
    let mut elements = vec![];
    placemark.find_all(&is_geometry, &mut elements);
    let mut properties = get_properties(placemark);
    if let Some(coord_times) = get_coord_times(&elements) {
        properties.insert("coordTimes".into(), coord_times);
    }
    let geometries: Vec<Geometry> = elements.into_iter().filter_map(get_geometry).collect();
    match combine(geometries) {
        Some(geometry) => Some(Feature::new(Some(geometry), properties)),
        None => {
            let name = properties.get("name").and_then(Value::as_str);
            debug!("skipping placemark without geometry: {:?}", name);
            None
        }
    }
}

/// Converts a KML document into a feature collection.
///
/// # Example
///
/// ```
/// use kml_summary::kml::parse;
///
/// let kml = r#"
///   <kml xmlns="http://www.opengis.net/kml/2.2">
///     <Placemark>
///       <name>Gate</name>
///       <Point><coordinates>13.37,52.51,0</coordinates></Point>
///     </Placemark>
///   </kml>
/// "#;
/// let collection = parse(kml).unwrap();
/// assert_eq!(collection.len(), 1);
/// assert_eq!(collection.features[0].name(), Some("Gate"));
/// ```
pub fn parse(kml: &str) -> Result<FeatureCollection> {
    let root = read_tree(kml)?;
    let mut placemarks = vec![];
    root.find_all(&|e: &Element| e.name == "Placemark", &mut placemarks);
    if placemarks.is_empty() {
        warn!("no placemarks found in kml document");
    }
    let features: Vec<Feature> = placemarks.into_iter().filter_map(get_feature).collect();
    debug!("converted {} placemarks", features.len());
    Ok(FeatureCollection::new(features))
}

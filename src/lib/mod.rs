use log::info;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

pub use self::error::{Error, Result};
pub use self::geo::{total_length, GeoCoordinate};
pub use self::geojson::{Feature, FeatureCollection, Geometry, GeometryKind};
pub use self::overlay::{map_view, overlays};
pub use self::summary::{classify, detailed_report, DetailedLengthEntry, Summary};

mod error;
pub mod geo;
pub mod geojson;
pub mod kml;
pub mod output;
pub mod overlay;
pub mod summary;
#[cfg(test)]
mod test_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Kml,
    GeoJson,
}

impl Format {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "kml" => Ok(Format::Kml),
            "geojson" | "json" => Ok(Format::GeoJson),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Reads a complete document and converts it into a feature collection.
///
/// Nothing is kept between calls, every load starts from scratch.
pub fn load(mut reader: impl Read, format: Format) -> Result<FeatureCollection> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let collection = match format {
        Format::Kml => kml::parse(&text)?,
        Format::GeoJson => serde_json::from_str(&text)?,
    };
    info!("loaded {} features ({:?})", collection.len(), format);
    Ok(collection)
}

#[cfg(test)]
mod load {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn format_from_path() {
        assert_eq!(Format::from_path(Path::new("run.kml")).unwrap(), Format::Kml);
        assert_eq!(Format::from_path(Path::new("RUN.KML")).unwrap(), Format::Kml);
        assert_eq!(
            Format::from_path(Path::new("run.geojson")).unwrap(),
            Format::GeoJson
        );
        assert_eq!(
            Format::from_path(Path::new("run.json")).unwrap(),
            Format::GeoJson
        );
        assert!(Format::from_path(Path::new("run.gpx")).is_err());
        assert!(Format::from_path(Path::new("run")).is_err());
    }

    #[test]
    fn load_kml() {
        let kml = "<kml><Placemark><LineString><coordinates>0,0 0,1</coordinates></LineString></Placemark></kml>";
        let collection = load(Cursor::new(kml), Format::Kml).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].kind(), GeometryKind::LineString);
    }

    #[test]
    fn load_geojson() {
        let json = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":{}}]}"#;
        let collection = load(Cursor::new(json), Format::GeoJson).unwrap();
        assert_eq!(classify(&collection).get("unknown"), 1);
    }

    #[test]
    fn load_malformed_geojson() {
        match load(Cursor::new("{"), Format::GeoJson) {
            Err(Error::Json(_)) => {}
            other => panic!("expected json error, got {:?}", other),
        }
    }

    #[test]
    fn load_invalid_utf8() {
        let bytes: &[u8] = &[0xff, 0xfe, 0x00];
        match load(bytes, Format::Kml) {
            Err(Error::Io(_)) => {}
            other => panic!("expected io error, got {:?}", other),
        }
    }
}

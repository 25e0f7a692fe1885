use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed kml at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },
    #[error("malformed geojson: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown file format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;

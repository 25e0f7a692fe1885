use super::geojson::FeatureCollection;
use super::overlay::{MapView, Overlay};
use super::summary::{DetailedLengthEntry, Summary};
use serde::{Deserialize, Serialize};
use serde_json::{to_string, to_string_pretty};
use std::error::Error;
use std::io::Write;

pub trait Output {
    fn write_json(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
}

fn write_pretty<T: Serialize + ?Sized>(value: &T, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let json = to_string_pretty(value)?;
    writeln!(writer, "{}", json)?;
    Ok(())
}

fn write_lines<'a, T: Serialize + 'a>(
    values: impl IntoIterator<Item = &'a T>,
    writer: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    for value in values {
        let json = to_string(value)?;
        writeln!(writer, "{}", json)?;
    }
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct JSONCount {
    #[serde(rename = "type")]
    kind: String,
    count: usize,
}

impl Output for Summary {
    fn write_json(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        write_pretty(self, writer)
    }

    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let counts: Vec<JSONCount> = self
            .iter()
            .map(|(kind, count)| JSONCount {
                kind: kind.into(),
                count,
            })
            .collect();
        write_lines(&counts, writer)
    }
}

impl Output for Vec<DetailedLengthEntry> {
    fn write_json(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        write_pretty(self, writer)
    }

    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        write_lines(self, writer)
    }
}

#[derive(Serialize)]
struct JSONMap<'a> {
    view: &'a MapView,
    overlays: &'a [Overlay],
}

impl Output for (MapView, Vec<Overlay>) {
    fn write_json(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let (view, overlays) = self;
        let map = JSONMap { view, overlays };
        write_pretty(&map, writer)
    }

    /// The view comes first, followed by one overlay per line.
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let (view, overlays) = self;
        writeln!(writer, "{}", to_string(view)?)?;
        write_lines(overlays, writer)
    }
}

impl Output for FeatureCollection {
    fn write_json(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let string = to_string(self)?;
        writeln!(writer, "{}", string)?;
        Ok(())
    }

    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        write_lines(&self.features, writer)
    }
}

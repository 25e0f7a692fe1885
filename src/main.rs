use kml_summary::output::Output;
use kml_summary::{classify, detailed_report, load, map_view, overlays, Format};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
struct Input {
    #[structopt(parse(from_os_str))]
    path: PathBuf,

    /// Input format (kml or geojson), guessed from the file extension if omitted
    #[structopt(short, long)]
    format: Option<Format>,

    /// Write one json document per line
    #[structopt(short, long)]
    json_lines: bool,
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "kml_summary",
    about = "Summarizes the geometries of KML and GeoJSON files"
)]
enum Opt {
    /// Number of features per geometry type
    Summary(Input),
    /// Length in km of every line feature
    Detailed(Input),
    /// The file converted to a GeoJSON feature collection
    Geojson(Input),
    /// Markers and polylines to put on a map
    Overlay(Input),
}

impl Opt {
    fn input(&self) -> &Input {
        match self {
            Opt::Summary(input)
            | Opt::Detailed(input)
            | Opt::Geojson(input)
            | Opt::Overlay(input) => input,
        }
    }
}

fn write(output: &impl Output, json_lines: bool) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json_lines {
        output.write_json_lines(&mut handle)
    } else {
        output.write_json(&mut handle)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opt = Opt::from_args();
    let input = opt.input();
    let format = match input.format {
        Some(format) => format,
        None => Format::from_path(&input.path)?,
    };
    let file = File::open(&input.path)?;
    let collection = load(BufReader::new(file), format)?;

    match &opt {
        Opt::Summary(_) => write(&classify(&collection), input.json_lines),
        Opt::Detailed(_) => write(&detailed_report(&collection), input.json_lines),
        Opt::Geojson(_) => write(&collection, input.json_lines),
        Opt::Overlay(_) => {
            let map = (map_view(&collection), overlays(&collection));
            write(&map, input.json_lines)
        }
    }
}

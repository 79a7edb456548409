use clap::{Parser, Subcommand};
use log::info;
use stream_georef::builder::CalibrationBuilder;
use stream_georef::calibration::CalibrationConfig;
use stream_georef::crs::Crs;
use stream_georef::error::{GeorefError, Result};
use stream_georef::io::geojson::read_streams_geojson;
use stream_georef::io::placed::{write_placed_csv, write_placed_geojson};
use stream_georef::io::sdi::{read_sdi_csv, write_sdi_csv};
use stream_georef::io::survey::read_survey_csv;
use stream_georef::placement::place_survey_points;

/// Command line tools for georeferencing stream survey data.
#[derive(Parser)]
#[command(name = "stream_georef_cli", version)]
struct Cli {
    /// EPSG code of the stream layer coordinate system
    #[arg(long, default_value_t = 4326, global = true)]
    epsg: u32,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a reviewable table of distance adjustment factors from survey
    /// data with x,y coordinates for some of the pools.
    CalibrationFactors {
        /// GeoJSON file containing one LineString per stream
        streams: String,
        /// CSV file of survey data
        survey: String,
        /// CSV file where the distance adjustment table is written
        output: String,
        /// Survey x,y columns are lat/long decimal degrees rather than
        /// stream layer coordinates
        #[arg(long)]
        sync_lat_long: bool,
    },
    /// Locate every survey row on its stream using a reviewed table of
    /// distance adjustment factors.
    Georeference {
        /// GeoJSON file containing one LineString per stream
        streams: String,
        /// CSV file of survey data
        survey: String,
        /// CSV file of distance adjustment factors, possibly hand-edited
        sdi: String,
        /// File where placed survey points are written
        output: String,
        /// Output format: csv or geojson
        #[arg(long, default_value = "csv")]
        format: String,
    },
}

fn require_file(path: &str) -> Result<()> {
    if std::path::Path::new(path).is_file() {
        Ok(())
    } else {
        Err(GeorefError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("cannot find file {path}"),
        )))
    }
}

fn run(cli: Cli) -> Result<()> {
    let crs = Crs::from_epsg(cli.epsg);
    let config = CalibrationConfig::default();
    match cli.command {
        Commands::CalibrationFactors {
            streams,
            survey,
            output,
            sync_lat_long,
        } => {
            require_file(&streams)?;
            require_file(&survey)?;
            let network = read_streams_geojson(&streams, crs)?;
            let rows = read_survey_csv(&survey)?;
            let builder = CalibrationBuilder::new(&network, config, sync_lat_long);
            let table = builder.build(&rows)?;
            write_sdi_csv(&output, &table, &config)?;
            info!(
                "developed adjustment factors for {} streams, saved to {}",
                table.len(),
                output
            );
            println!("Wrote {}", output);
        }
        Commands::Georeference {
            streams,
            survey,
            sdi,
            output,
            format,
        } => {
            require_file(&streams)?;
            require_file(&survey)?;
            require_file(&sdi)?;
            let network = read_streams_geojson(&streams, crs)?;
            let rows = read_survey_csv(&survey)?;
            let table = read_sdi_csv(&sdi, &config)?;
            let placed = place_survey_points(&rows, &table, &network, &config)?;
            match format.as_str() {
                "csv" => write_placed_csv(&output, &placed)?,
                "geojson" => write_placed_geojson(&output, &placed)?,
                other => {
                    return Err(GeorefError::Format {
                        reason: format!("unknown output format {other}"),
                    })
                }
            }
            info!(
                "georeferenced {} survey points, saved to {}",
                placed.len(),
                output
            );
            println!("Wrote {}", output);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

use clap::{Parser, ValueEnum};
use geo_area_interpolation::{run, OutputFormat, Point, Region, RunConfig};
use log::{error, warn};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Geojson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Geojson => OutputFormat::GeoJson,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "interpolate-area")]
#[command(about = "Interpolate chemical readings over an area, one grid per timestamp")]
struct Cli {
    /// Lower corner of the region (inclusive)
    #[arg(
        long,
        num_args = 2,
        value_names = ["X0", "Y0"],
        allow_negative_numbers = true,
        required = true
    )]
    start: Vec<i64>,

    /// Upper corner of the region (exclusive)
    #[arg(
        long,
        num_args = 2,
        value_names = ["X1", "Y1"],
        allow_negative_numbers = true,
        required = true
    )]
    end: Vec<i64>,

    /// Monitor positions: id,x,y with a header row
    #[arg(long, default_value = "data/processed/monitors.csv")]
    monitors: PathBuf,

    /// Readings: chemical,monitor,timestamp,value with a header row
    #[arg(long)]
    readings: PathBuf,

    /// Directory receiving one file per timestamp
    #[arg(long, default_value = "data/processed/gas")]
    output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Only interpolate readings of this chemical
    #[arg(long)]
    chemical: Option<String>,

    /// Process timestamps one after another on a single thread
    #[arg(long)]
    sequential: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let region = match Region::new(
        Point::new(cli.start[0], cli.start[1]),
        Point::new(cli.end[0], cli.end[1]),
    ) {
        Ok(region) => region,
        Err(err) => {
            error!("{}", err);
            eprintln!("interpolate-area: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let config = RunConfig {
        region,
        monitors: cli.monitors,
        readings: cli.readings,
        output_dir: cli.output_dir,
        format: cli.format.into(),
        chemical: cli.chemical,
        concurrent: !cli.sequential,
    };

    match run(&config) {
        Ok(report) => {
            for warning in report.diagnostics().warnings() {
                warn!("{}", warning);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("interpolate-area: {}", err);
            ExitCode::FAILURE
        }
    }
}

//! Maritime Compliance CLI
//!
//! Reads one JSON input file per calculation and prints the JSON result

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use maritime_compliance::cii::CapInput;
use maritime_compliance::ets::reporting_year;
use maritime_compliance::{
    BiofuelComponent, CiiInput, ComplianceRunner, EfficiencyMeasures, FossilComponent,
    FuelEuState, GfiState, VoyageRecord,
};

const DEPARTURE_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Parser)]
#[command(name = "maritime-compliance", version, about = "Maritime GHG compliance calculations")]
struct Cli {
    /// Directory with registry CSV files (defaults to the built-in coefficients)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Blended carbon factor of a biofuel + fossil mix
    Blend { input: PathBuf },
    /// CII attained/required and A-E rating
    Cii { input: PathBuf },
    /// CII with efficiency measures applied
    Simulate { input: PathBuf },
    /// Corrective action plan aggregation over monthly logs
    Cap { input: PathBuf },
    /// EU ETS allowances for a voyage
    Ets {
        input: PathBuf,
        /// Departure timestamp (YYYY-MM-DDTHH:MM); overrides the input year
        #[arg(long)]
        departure: Option<String>,
    },
    /// FuelEU Maritime compliance balance and penalty
    Fueleu { input: PathBuf },
    /// IMO GFI tiers and remedial-unit penalty
    Gfi { input: PathBuf },
}

#[derive(Debug, Deserialize)]
struct BlendRequest {
    biofuel: BiofuelComponent,
    fossil: FossilComponent,
}

#[derive(Debug, Deserialize)]
struct SimulateRequest {
    ship: CiiInput,
    #[serde(default)]
    measures: EfficiencyMeasures,
}

fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let runner = match &cli.registry {
        Some(dir) => ComplianceRunner::from_csv_path(dir)
            .with_context(|| format!("failed to load registry from {}", dir.display()))?,
        None => ComplianceRunner::new(),
    };

    match &cli.command {
        Command::Blend { input } => {
            let request: BlendRequest = read_input(input)?;
            print_json(&runner.blend(&request.biofuel, &request.fossil)?, cli.pretty)
        }
        Command::Cii { input } => {
            let ship: CiiInput = read_input(input)?;
            print_json(&runner.cii(&ship)?, cli.pretty)
        }
        Command::Simulate { input } => {
            let request: SimulateRequest = read_input(input)?;
            print_json(&runner.simulate(&request.ship, &request.measures)?, cli.pretty)
        }
        Command::Cap { input } => {
            let cap: CapInput = read_input(input)?;
            print_json(&runner.cap(&cap)?, cli.pretty)
        }
        Command::Ets { input, departure } => {
            let mut voyage: VoyageRecord = read_input(input)?;
            if let Some(departure) = departure {
                let timestamp = NaiveDateTime::parse_from_str(departure, DEPARTURE_FORMAT)
                    .with_context(|| format!("invalid departure timestamp {}", departure))?;
                match reporting_year(timestamp) {
                    Some(year) => voyage.year = year,
                    None => bail!("departure {} is outside the ETS reporting window", departure),
                }
            }
            print_json(&runner.ets(&voyage)?, cli.pretty)
        }
        Command::Fueleu { input } => {
            let state: FuelEuState = read_input(input)?;
            print_json(&runner.fueleu(&state)?, cli.pretty)
        }
        Command::Gfi { input } => {
            let state: GfiState = read_input(input)?;
            print_json(&runner.gfi(&state)?, cli.pretty)
        }
    }
}

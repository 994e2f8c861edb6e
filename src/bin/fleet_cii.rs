//! Rate a whole fleet from a vessel CSV
//!
//! Outputs one CII row per vessel to fleet_cii_output.csv

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use maritime_compliance::{CiiEngine, CiiInput, CiiResult, FuelType, Registry, ShipType};

#[derive(Debug, Parser)]
#[command(name = "fleet_cii", about = "CII ratings for every vessel in a fleet CSV")]
struct Args {
    /// Fleet CSV (vessel, ship_type, dwt, distance, hfo, lfo, vlsfo, mgo, lng, year)
    #[arg(long, default_value = "data/fleet.csv")]
    fleet: PathBuf,

    /// Registry CSV directory (defaults to the built-in coefficients)
    #[arg(long)]
    registry: Option<PathBuf>,

    #[arg(long, default_value = "fleet_cii_output.csv")]
    output: PathBuf,
}

#[derive(Debug, Deserialize)]
struct VesselRow {
    vessel: String,
    ship_type: String,
    dwt: f64,
    distance: f64,
    #[serde(default)]
    hfo: f64,
    #[serde(default)]
    lfo: f64,
    #[serde(default)]
    vlsfo: f64,
    #[serde(default)]
    mgo: f64,
    #[serde(default)]
    lng: f64,
    year: u32,
}

/// One line of fleet_cii_output.csv
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutputRow<'a> {
    vessel: &'a str,
    ship_type: String,
    year: u32,
    #[serde(rename = "CO2")]
    co2: String,
    attained: String,
    required: String,
    ratio: String,
    rating: String,
    /// D or E this year; a plan also needs the D streak, which the fleet CSV lacks
    inferior_rating: bool,
}

impl<'a> OutputRow<'a> {
    fn new(vessel: &'a str, cii: &CiiResult) -> Self {
        Self {
            vessel,
            ship_type: cii.ship_type.to_string(),
            year: cii.year,
            co2: format!("{:.2}", cii.co2),
            attained: format!("{:.4}", cii.attained),
            required: format!("{:.4}", cii.required),
            ratio: format!("{:.4}", cii.ratio),
            rating: cii.rating.to_string(),
            inferior_rating: cii.rating.is_inferior_rating(),
        }
    }
}

impl VesselRow {
    fn to_input(&self) -> Result<CiiInput> {
        let ship_type: ShipType = self
            .ship_type
            .parse()
            .with_context(|| format!("vessel {}", self.vessel))?;

        let fuel_mass: BTreeMap<FuelType, f64> = [
            (FuelType::Hfo, self.hfo),
            (FuelType::Lfo, self.lfo),
            (FuelType::Vlsfo, self.vlsfo),
            (FuelType::Mgo, self.mgo),
            (FuelType::Lng, self.lng),
        ]
        .into_iter()
        .filter(|&(_, mass)| mass != 0.0)
        .collect();

        Ok(CiiInput {
            ship_type,
            dwt: self.dwt,
            distance: self.distance,
            fuel_mass,
            year: self.year,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let registry = match &args.registry {
        Some(dir) => Registry::from_csv_path(dir)
            .with_context(|| format!("failed to load registry from {}", dir.display()))?,
        None => Registry::default_regulatory(),
    };

    println!("Loading fleet from {}...", args.fleet.display());
    let mut reader = csv::Reader::from_path(&args.fleet)
        .with_context(|| format!("failed to open {}", args.fleet.display()))?;
    let vessels: Vec<VesselRow> = reader
        .deserialize()
        .collect::<std::result::Result<_, csv::Error>>()
        .context("failed to parse fleet CSV")?;
    println!("Loaded {} vessels in {:?}", vessels.len(), start.elapsed());

    // Rate vessels in parallel
    let engine = CiiEngine::new(&registry);
    let results: Vec<(&VesselRow, Result<CiiResult>)> = vessels
        .par_iter()
        .map(|vessel| {
            let result = vessel
                .to_input()
                .and_then(|input| engine.compute(&input).map_err(anyhow::Error::from));
            (vessel, result)
        })
        .collect();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut failed = 0;
    let mut ratings: BTreeMap<String, usize> = BTreeMap::new();
    for (vessel, result) in &results {
        match result {
            Ok(cii) => {
                *ratings.entry(cii.rating.to_string()).or_default() += 1;
                writer.serialize(OutputRow::new(&vessel.vessel, cii))?;
            }
            Err(e) => {
                failed += 1;
                log::warn!("skipping vessel {}: {:#}", vessel.vessel, e);
            }
        }
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());

    println!("\nFleet Summary:");
    for (rating, count) in &ratings {
        println!("  {}: {}", rating, count);
    }
    if failed > 0 {
        println!("  Skipped: {}", failed);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

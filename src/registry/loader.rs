//! CSV-based registry loader
//!
//! Loads regulatory coefficients from CSV files in data/registry/

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use super::fuels::{FuelStandard, FuelType};
use super::ships::{CiiCoefficients, ShipType};
use crate::error::{ComplianceError, Result};

/// Default path to registry directory
pub const DEFAULT_REGISTRY_PATH: &str = "data/registry";

#[derive(Debug, Deserialize)]
struct FuelStandardRow {
    fuel: String,
    name: String,
    lcv: f64,
    cf: f64,
}

#[derive(Debug, Deserialize)]
struct ShipCoefficientRow {
    ship_type: String,
    a: f64,
    c: f64,
    d1: f64,
    d2: f64,
    d3: f64,
    d4: f64,
}

#[derive(Debug, Deserialize)]
struct YearValueRow {
    year: u32,
    value: f64,
}

fn open(path: &Path, file_name: &str) -> Result<csv::Reader<File>> {
    let file = File::open(path.join(file_name))?;
    Ok(csv::Reader::from_reader(file))
}

/// Load fuel standards from fuel_standards.csv
/// Columns: fuel,name,lcv,cf
pub fn load_fuel_standards(path: &Path) -> Result<HashMap<FuelType, FuelStandard>> {
    let mut reader = open(path, "fuel_standards.csv")?;
    let mut standards = HashMap::new();

    for result in reader.deserialize() {
        let row: FuelStandardRow = result?;
        let fuel: FuelType = row.fuel.parse()?;
        standards.insert(fuel, FuelStandard { name: row.name, lcv: row.lcv, cf: row.cf });
    }

    Ok(standards)
}

/// Load CII coefficients from ship_coefficients.csv
/// Columns: ship_type,a,c,d1,d2,d3,d4
pub fn load_ship_coefficients(path: &Path) -> Result<HashMap<ShipType, CiiCoefficients>> {
    let mut reader = open(path, "ship_coefficients.csv")?;
    let mut coefficients = HashMap::new();

    for result in reader.deserialize() {
        let row: ShipCoefficientRow = result?;
        let ship_type: ShipType = row.ship_type.parse()?;
        coefficients.insert(
            ship_type,
            CiiCoefficients::new(row.a, row.c, row.d1, row.d2, row.d3, row.d4),
        );
    }

    Ok(coefficients)
}

/// Load a year-indexed table
/// Columns: year,value
pub fn load_year_values(path: &Path, file_name: &str) -> Result<Vec<(u32, f64)>> {
    let mut reader = open(path, file_name)?;
    let mut values = Vec::new();

    for result in reader.deserialize() {
        let row: YearValueRow = result?;
        if !row.value.is_finite() {
            return Err(ComplianceError::InvalidRegistry(format!(
                "{}: non-finite value for {}",
                file_name, row.year
            )));
        }
        values.push((row.year, row.value));
    }

    Ok(values)
}

/// Raw registry tables loaded from a directory
pub struct LoadedRegistry {
    pub fuel_standards: HashMap<FuelType, FuelStandard>,
    pub ship_coefficients: HashMap<ShipType, CiiCoefficients>,
    pub cii_reduction: Vec<(u32, f64)>,
    pub ets_phase_in: Vec<(u32, f64)>,
    pub fueleu_reduction: Vec<(u32, f64)>,
    pub gfi_base_reduction: Vec<(u32, f64)>,
    pub gfi_direct_reduction: Vec<(u32, f64)>,
}

impl LoadedRegistry {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_REGISTRY_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        log::debug!("loading registry tables from {}", path.display());
        Ok(Self {
            fuel_standards: load_fuel_standards(path)?,
            ship_coefficients: load_ship_coefficients(path)?,
            cii_reduction: load_year_values(path, "cii_reduction_factors.csv")?,
            ets_phase_in: load_year_values(path, "ets_phase_in.csv")?,
            fueleu_reduction: load_year_values(path, "fueleu_reduction_targets.csv")?,
            gfi_base_reduction: load_year_values(path, "gfi_base_reductions.csv")?,
            gfi_direct_reduction: load_year_values(path, "gfi_direct_reductions.csv")?,
        })
    }
}

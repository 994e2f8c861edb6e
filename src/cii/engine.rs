//! Attained vs. required CII for one ship and one reporting year

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rating::{BandLimits, Rating};
use crate::error::{ensure_non_negative, Result};
use crate::registry::{CiiCoefficients, FuelType, Registry, ShipType};

/// Annual operating data for a CII calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiiInput {
    pub ship_type: ShipType,
    /// Deadweight tonnage
    pub dwt: f64,
    /// Distance sailed (NM)
    pub distance: f64,
    /// Fuel consumed (MT) by fuel type
    pub fuel_mass: BTreeMap<FuelType, f64>,
    pub year: u32,
}

/// Every intermediate term of a CII rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiiResult {
    pub ship_type: ShipType,
    pub year: u32,
    /// Total CO2 emitted (MT)
    pub co2: f64,
    /// Attained CII (gCO2/dwt·nm)
    pub attained: f64,
    pub reference: f64,
    /// Reduction factor Z (%)
    pub reduction_factor: f64,
    pub required: f64,
    /// attained / required
    pub ratio: f64,
    pub rating: Rating,
    pub boundaries: CiiCoefficients,
    pub band_limits: BandLimits,
}

/// CII calculator bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct CiiEngine<'r> {
    registry: &'r Registry,
}

impl<'r> CiiEngine<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Total CO2 (MT) = Σ mass × Cf
    pub fn base_co2(&self, fuel_mass: &BTreeMap<FuelType, f64>) -> Result<f64> {
        let mut total = 0.0;
        for (&fuel, &mass) in fuel_mass {
            ensure_non_negative("fuel_mass", mass)?;
            total += mass * self.registry.fuels.standard_for(fuel)?.cf;
        }
        Ok(total)
    }

    /// Rate a ship from its fuel consumption
    pub fn compute(&self, input: &CiiInput) -> Result<CiiResult> {
        let co2 = self.base_co2(&input.fuel_mass)?;
        self.evaluate(input.ship_type, input.dwt, input.distance, co2, input.year)
    }

    /// Rate a ship from an already-known CO2 total (MT)
    pub fn evaluate(
        &self,
        ship_type: ShipType,
        dwt: f64,
        distance: f64,
        co2: f64,
        year: u32,
    ) -> Result<CiiResult> {
        ensure_non_negative("dwt", dwt)?;
        ensure_non_negative("distance", distance)?;
        ensure_non_negative("co2", co2)?;

        let coefficients = *self.registry.ships.coefficients(ship_type)?;

        let attained = if dwt > 0.0 && distance > 0.0 {
            co2 * 1_000_000.0 / (dwt * distance)
        } else {
            0.0
        };

        let (reference, reduction_factor, required) = self.required_cii(ship_type, dwt, year)?;

        let ratio = if required > 0.0 { attained / required } else { 0.0 };
        let rating = Rating::from_ratio(ratio, &coefficients);

        log::debug!(
            "CII {} {}: attained={:.4} required={:.4} ratio={:.4} rating={}",
            ship_type,
            year,
            attained,
            required,
            ratio,
            rating
        );

        Ok(CiiResult {
            ship_type,
            year,
            co2,
            attained,
            reference,
            reduction_factor,
            required,
            ratio,
            rating,
            boundaries: coefficients,
            band_limits: BandLimits::new(required, &coefficients),
        })
    }

    /// Returns (reference CII, Z %, required CII)
    pub fn required_cii(
        &self,
        ship_type: ShipType,
        dwt: f64,
        year: u32,
    ) -> Result<(f64, f64, f64)> {
        let coefficients = self.registry.ships.coefficients(ship_type)?;
        let reference = coefficients.reference_cii(dwt);
        let z = self.registry.tables.cii_reduction.lookup(year)?;
        Ok((reference, z, reference * ((100.0 - z) / 100.0)))
    }
}

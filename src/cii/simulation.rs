//! What-if overlay: efficiency measures layered on a CII calculation
//!
//! Each measure scales the annual CO2 by a fixed factor; factors compose
//! multiplicatively.

use serde::{Deserialize, Serialize};

use super::engine::{CiiEngine, CiiInput, CiiResult};
use crate::error::{ensure_percent, Result};

/// Assumed lifecycle CO2 reduction of biofuel relative to the fuel it replaces.
/// Policy constant pending confirmation against current regulatory guidance.
pub const BIOFUEL_LIFECYCLE_REDUCTION: f64 = 0.8;

pub const MEWIS_DUCT_FACTOR: f64 = 0.97;
pub const AIR_LUBRICATION_FACTOR: f64 = 0.95;
pub const HULL_COATING_FACTOR: f64 = 0.96;

/// Share of a power-limit percentage that turns into CO2 savings
pub const POWER_LIMIT_EFFECT: f64 = 0.6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyMeasures {
    /// Share of fuel replaced by biofuel (%)
    pub biofuel_percent: f64,
    pub mewis_duct: bool,
    pub air_lubrication: bool,
    pub hull_coating: bool,
    /// Engine/shaft power limitation (%)
    pub power_limit_percent: f64,
}

impl EfficiencyMeasures {
    pub fn validate(&self) -> Result<()> {
        ensure_percent("biofuel_percent", self.biofuel_percent)?;
        ensure_percent("power_limit_percent", self.power_limit_percent)
    }

    /// Combined multiplier applied to baseline CO2
    pub fn co2_multiplier(&self) -> f64 {
        let mut factor = 1.0 - (self.biofuel_percent / 100.0) * BIOFUEL_LIFECYCLE_REDUCTION;

        if self.mewis_duct {
            factor *= MEWIS_DUCT_FACTOR;
        }
        if self.air_lubrication {
            factor *= AIR_LUBRICATION_FACTOR;
        }
        if self.hull_coating {
            factor *= HULL_COATING_FACTOR;
        }
        if self.power_limit_percent > 0.0 {
            factor *= 1.0 - (self.power_limit_percent / 100.0) * POWER_LIMIT_EFFECT;
        }

        factor
    }
}

/// Actual vs. simulated CII
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiiSimulation {
    pub actual: CiiResult,
    pub simulated: CiiResult,
    pub co2_multiplier: f64,
    /// Baseline CO2 minus simulated CO2 (MT)
    pub co2_savings: f64,
}

impl CiiSimulation {
    pub fn improves_rating(&self) -> bool {
        self.simulated.rating < self.actual.rating
    }
}

impl<'r> CiiEngine<'r> {
    /// Rate the ship as operated and with the given measures applied
    pub fn simulate(
        &self,
        input: &CiiInput,
        measures: &EfficiencyMeasures,
    ) -> Result<CiiSimulation> {
        measures.validate()?;

        let actual = self.compute(input)?;
        let multiplier = measures.co2_multiplier();
        let simulated_co2 = actual.co2 * multiplier;
        let simulated = self.evaluate(
            input.ship_type,
            input.dwt,
            input.distance,
            simulated_co2,
            input.year,
        )?;

        Ok(CiiSimulation {
            co2_savings: actual.co2 - simulated_co2,
            actual,
            simulated,
            co2_multiplier: multiplier,
        })
    }
}

//! Corrective Action Plan (CAP) aggregation
//!
//! Rolls twelve monthly operating logs and a bunker ledger up into one annual
//! CII evaluation, and projects the required CII and rating bands over the
//! 2023-2030 trajectory.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::engine::{CiiEngine, CiiResult};
use super::rating::{BandLimits, Rating};
use crate::error::{ensure_non_negative, ComplianceError, Result};
use crate::registry::{FuelType, ShipType};

/// Carbon factor used when the fuel ledger is empty (VLSFO/LFO)
pub const DEFAULT_LEDGER_CF: f64 = 3.151;

/// Years charted in the CAP trajectory
pub const TRAJECTORY_YEARS: RangeInclusive<u32> = 2023..=2030;

pub const MONTHS_PER_YEAR: usize = 12;

/// One month of operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyLog {
    pub sea_days: f64,
    pub port_days: f64,
    pub anchorage_days: f64,
    /// MT
    pub sea_consumption: f64,
    /// MT
    pub port_consumption: f64,
    /// NM
    pub distance: f64,
}

impl MonthlyLog {
    fn validate(&self) -> Result<()> {
        ensure_non_negative("sea_days", self.sea_days)?;
        ensure_non_negative("port_days", self.port_days)?;
        ensure_non_negative("anchorage_days", self.anchorage_days)?;
        ensure_non_negative("sea_consumption", self.sea_consumption)?;
        ensure_non_negative("port_consumption", self.port_consumption)?;
        ensure_non_negative("distance", self.distance)
    }
}

/// Annual operating figures; also the sum of twelve monthly logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualBaseline {
    pub sea_days: f64,
    pub port_days: f64,
    pub anchorage_days: f64,
    pub sea_consumption: f64,
    pub port_consumption: f64,
    pub distance: f64,
}

impl AnnualBaseline {
    pub fn from_logs(logs: &[MonthlyLog]) -> Self {
        logs.iter().fold(Self::default(), |mut acc, month| {
            acc.sea_days += month.sea_days;
            acc.port_days += month.port_days;
            acc.anchorage_days += month.anchorage_days;
            acc.sea_consumption += month.sea_consumption;
            acc.port_consumption += month.port_consumption;
            acc.distance += month.distance;
            acc
        })
    }

    pub fn fuel_mass(&self) -> f64 {
        self.sea_consumption + self.port_consumption
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Spread an annual baseline evenly over twelve months (one decimal)
pub fn sync_annual_to_monthly(baseline: &AnnualBaseline) -> Vec<MonthlyLog> {
    let months = MONTHS_PER_YEAR as f64;
    let month = MonthlyLog {
        sea_days: round1(baseline.sea_days / months),
        port_days: round1(baseline.port_days / months),
        anchorage_days: round1(baseline.anchorage_days / months),
        sea_consumption: round1(baseline.sea_consumption / months),
        port_consumption: round1(baseline.port_consumption / months),
        distance: round1(baseline.distance / months),
    };
    vec![month; MONTHS_PER_YEAR]
}

/// Monthly totals minus the annual baseline, per field
pub fn reconcile(logs: &[MonthlyLog], baseline: &AnnualBaseline) -> AnnualBaseline {
    let totals = AnnualBaseline::from_logs(logs);
    AnnualBaseline {
        sea_days: totals.sea_days - baseline.sea_days,
        port_days: totals.port_days - baseline.port_days,
        anchorage_days: totals.anchorage_days - baseline.anchorage_days,
        sea_consumption: totals.sea_consumption - baseline.sea_consumption,
        port_consumption: totals.port_consumption - baseline.port_consumption,
        distance: totals.distance - baseline.distance,
    }
}

/// Bunker ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelLedgerItem {
    pub label: String,
    /// MT
    pub mass: f64,
    /// gCO2/g fuel
    pub cf: f64,
}

impl FuelLedgerItem {
    /// Ledger entry priced at the registry's carbon factor
    pub fn from_fuel(engine: &CiiEngine<'_>, fuel: FuelType, mass: f64) -> Result<Self> {
        let standard = engine.registry().fuels.standard_for(fuel)?;
        Ok(Self {
            label: fuel.to_string(),
            mass,
            cf: standard.cf,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapInput {
    pub ship_type: ShipType,
    pub dwt: f64,
    pub year: u32,
    pub monthly_logs: Vec<MonthlyLog>,
    pub fuel_ledger: Vec<FuelLedgerItem>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub year: u32,
    pub required: f64,
    pub bands: BandLimits,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthlyAverages {
    pub sea_days: f64,
    pub port_days: f64,
    pub anchorage_days: f64,
    pub distance: f64,
    pub consumption: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapResult {
    pub totals: AnnualBaseline,
    pub ledger_mass: f64,
    pub ledger_co2: f64,
    /// Effective carbon factor derived from the ledger
    pub effective_cf: f64,
    /// Annual CO2 (MT)
    pub annual_co2: f64,
    pub cii: CiiResult,
    /// None when the ship logged no activity
    pub rating: Option<Rating>,
    /// Upper limit of the C band
    pub target_c: f64,
    /// Attained CII above (+) or below (-) the C boundary, in percent
    pub excess_pct: f64,
    pub trajectory: Vec<TrajectoryPoint>,
    pub monthly_averages: MonthlyAverages,
}

/// Annual CII aggregation over monthly logs and a fuel ledger
#[derive(Debug, Clone, Copy)]
pub struct CapAggregator<'r> {
    engine: CiiEngine<'r>,
}

impl<'r> CapAggregator<'r> {
    pub fn new(engine: CiiEngine<'r>) -> Self {
        Self { engine }
    }

    pub fn aggregate(&self, input: &CapInput) -> Result<CapResult> {
        if input.monthly_logs.len() != MONTHS_PER_YEAR {
            return Err(ComplianceError::InvalidInput {
                field: "monthly_logs",
                value: input.monthly_logs.len() as f64,
            });
        }
        for entry in &input.monthly_logs {
            entry.validate()?;
        }

        let totals = AnnualBaseline::from_logs(&input.monthly_logs);

        let mut ledger_mass = 0.0;
        let mut ledger_co2 = 0.0;
        for item in &input.fuel_ledger {
            ensure_non_negative("ledger.mass", item.mass)?;
            ensure_non_negative("ledger.cf", item.cf)?;
            ledger_mass += item.mass;
            ledger_co2 += item.mass * item.cf;
        }

        let effective_cf = if ledger_mass > 0.0 {
            ledger_co2 / ledger_mass
        } else {
            log::warn!("fuel ledger is empty; using default Cf {}", DEFAULT_LEDGER_CF);
            DEFAULT_LEDGER_CF
        };

        let annual_co2 = totals.fuel_mass() * effective_cf;
        let cii = self.engine.evaluate(
            input.ship_type,
            input.dwt,
            totals.distance,
            annual_co2,
            input.year,
        )?;

        let rating = if cii.attained > 0.0 { Some(cii.rating) } else { None };
        let target_c = cii.band_limits.c;
        let excess_pct = if target_c > 0.0 {
            (cii.attained - target_c) / target_c * 100.0
        } else {
            0.0
        };

        let trajectory = self.trajectory(input.ship_type, input.dwt)?;

        let months = MONTHS_PER_YEAR as f64;
        let monthly_averages = MonthlyAverages {
            sea_days: totals.sea_days / months,
            port_days: totals.port_days / months,
            anchorage_days: totals.anchorage_days / months,
            distance: totals.distance / months,
            consumption: totals.fuel_mass() / months,
        };

        Ok(CapResult {
            totals,
            ledger_mass,
            ledger_co2,
            effective_cf,
            annual_co2,
            cii,
            rating,
            target_c,
            excess_pct,
            trajectory,
            monthly_averages,
        })
    }

    /// Required CII and band limits for each trajectory year
    pub fn trajectory(&self, ship_type: ShipType, dwt: f64) -> Result<Vec<TrajectoryPoint>> {
        let coefficients = *self.engine.registry().ships.coefficients(ship_type)?;
        TRAJECTORY_YEARS
            .map(|year| -> Result<TrajectoryPoint> {
                let (_, _, required) = self.engine.required_cii(ship_type, dwt, year)?;
                Ok(TrajectoryPoint {
                    year,
                    required,
                    bands: BandLimits::new(required, &coefficients),
                })
            })
            .collect()
    }
}

//! FuelEU Maritime GHG intensity, compliance balance and penalty

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mechanisms::{borrowing_cap, ComplianceMechanisms, MechanismCredits};
use crate::blend::GRAMS_PER_TONNE;
use crate::error::{ensure_non_negative, Result};
use crate::registry::{EnergyCarrier, Registry};

/// 2020 reference GHG intensity (gCO2eq/MJ)
pub const BASELINE_INTENSITY: f64 = 91.16;

/// EUR per tonne of VLSFO-equivalent energy in deficit
pub const PENALTY_RATE: f64 = 2400.0;

/// MJ per tonne of VLSFO
pub const VLSFO_ENERGY_DENSITY: f64 = 41_000.0;

/// RFNBOs count as zero-emission up to and including this year
pub const RFNBO_REWARD_LAST_YEAR: u32 = 2033;

/// Share of energy counted for ice-class vessels
pub const ICE_CLASS_ENERGY_FACTOR: f64 = 0.95;

pub const MAX_NON_COMPLIANCE_STREAK: u32 = 10;

/// Reporting-period state of one ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelEuState {
    pub year: u32,
    /// Fuel consumed (MT) per energy carrier
    pub fuel_mass: BTreeMap<EnergyCarrier, f64>,
    #[serde(default)]
    pub ice_class: bool,
    #[serde(default)]
    pub mechanisms: ComplianceMechanisms,
    /// Consecutive periods with a penalty, including this one
    #[serde(default = "default_streak")]
    pub consecutive_non_compliance_years: u32,
}

fn default_streak() -> u32 {
    1
}

/// Energy and emissions of one carrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierBreakdown {
    pub carrier: EnergyCarrier,
    /// MJ, after any ice-class reduction
    pub energy: f64,
    /// gCO2eq
    pub emissions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelEuResult {
    pub year: u32,
    /// Reduction vs. the 2020 baseline (%)
    pub reduction_percent: f64,
    /// gCO2eq/MJ
    pub target_intensity: f64,
    /// gCO2eq/MJ
    pub actual_intensity: f64,
    /// MJ
    pub total_energy: f64,
    /// gCO2eq
    pub total_emissions: f64,
    pub carriers: Vec<CarrierBreakdown>,
    /// Compliance balance before mechanisms (gCO2eq, negative = deficit)
    pub raw_balance: f64,
    pub credits: MechanismCredits,
    /// gCO2eq
    pub borrowing_cap: f64,
    /// Compliance balance after mechanisms (gCO2eq)
    pub final_balance: f64,
    pub is_deficit: bool,
    pub penalty_multiplier: f64,
    /// EUR
    pub penalty: f64,
}

impl FuelEuResult {
    /// Final balance in tonnes CO2eq
    pub fn balance_tonnes(&self) -> f64 {
        self.final_balance / GRAMS_PER_TONNE
    }
}

/// Penalty multiplier for repeated non-compliance: 1 + (n - 1) / 10
pub fn streak_multiplier(consecutive_years: u32) -> f64 {
    let streak = consecutive_years.clamp(1, MAX_NON_COMPLIANCE_STREAK);
    if streak != consecutive_years {
        log::debug!(
            "non-compliance streak {} clamped to {}",
            consecutive_years,
            streak
        );
    }
    1.0 + f64::from(streak - 1) / 10.0
}

/// FuelEU calculator bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct FuelEuEngine<'r> {
    registry: &'r Registry,
}

impl<'r> FuelEuEngine<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Target intensity for a year and the reduction it embeds (fraction)
    pub fn target_intensity(&self, year: u32) -> Result<(f64, f64)> {
        let reduction = self.registry.tables.fueleu_reduction.lookup(year)?;
        Ok((BASELINE_INTENSITY * (1.0 - reduction), reduction))
    }

    pub fn compute(&self, state: &FuelEuState) -> Result<FuelEuResult> {
        state.mechanisms.validate()?;

        let (target, reduction) = self.target_intensity(state.year)?;

        let mut carriers = Vec::with_capacity(state.fuel_mass.len());
        for (&carrier, &mass) in &state.fuel_mass {
            ensure_non_negative("fuel_mass", mass)?;
            let intensity = self.registry.fuels.wtw_intensity(carrier)?;

            let mut energy = mass * GRAMS_PER_TONNE * intensity.lcv;
            if state.ice_class {
                energy *= ICE_CLASS_ENERGY_FACTOR;
            }

            let rfnbo_reward = state.year <= RFNBO_REWARD_LAST_YEAR;
            let emissions = if carrier == EnergyCarrier::Rfnbo && rfnbo_reward {
                0.0
            } else {
                energy * intensity.total()
            };

            carriers.push(CarrierBreakdown { carrier, energy, emissions });
        }

        let total_energy: f64 = carriers.iter().map(|c| c.energy).sum();
        let total_emissions: f64 = carriers.iter().map(|c| c.emissions).sum();
        let actual = if total_energy > 0.0 {
            total_emissions / total_energy
        } else {
            0.0
        };

        let raw_balance = (target - actual) * total_energy;
        let cap = borrowing_cap(target, total_energy);
        let credits = state.mechanisms.credits(cap);
        let final_balance = raw_balance + credits.total();

        let is_deficit = final_balance < 0.0;
        let multiplier = streak_multiplier(state.consecutive_non_compliance_years);
        let penalty = if is_deficit && actual > 0.0 {
            final_balance.abs() / (actual * VLSFO_ENERGY_DENSITY) * PENALTY_RATE * multiplier
        } else {
            0.0
        };

        log::debug!(
            "FuelEU {}: target={:.4} actual={:.4} CB={:.0} g final={:.0} g penalty={:.2}",
            state.year,
            target,
            actual,
            raw_balance,
            final_balance,
            penalty
        );

        Ok(FuelEuResult {
            year: state.year,
            reduction_percent: reduction * 100.0,
            target_intensity: target,
            actual_intensity: actual,
            total_energy,
            total_emissions,
            carriers,
            raw_balance,
            credits,
            borrowing_cap: cap,
            final_balance,
            is_deficit,
            penalty_multiplier: multiplier,
            penalty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fueleu::mechanisms::Mechanism;
    use approx::assert_relative_eq;

    fn fleet_2025() -> FuelEuState {
        let mut fuel_mass = BTreeMap::new();
        fuel_mass.insert(EnergyCarrier::Hfo, 10_000.0);
        fuel_mass.insert(EnergyCarrier::Mgo, 1_500.0);
        fuel_mass.insert(EnergyCarrier::Bio, 200.0);
        fuel_mass.insert(EnergyCarrier::Rfnbo, 50.0);
        FuelEuState {
            year: 2025,
            fuel_mass,
            ice_class: false,
            mechanisms: ComplianceMechanisms::default(),
            consecutive_non_compliance_years: 1,
        }
    }

    fn all_fossil_2025() -> FuelEuState {
        let mut fuel_mass = BTreeMap::new();
        fuel_mass.insert(EnergyCarrier::Hfo, 10_000.0);
        fuel_mass.insert(EnergyCarrier::Mgo, 1_500.0);
        FuelEuState {
            fuel_mass,
            ..fleet_2025()
        }
    }

    #[test]
    fn test_target_intensity_floor_lookup() {
        let engine = FuelEuEngine::new(Registry::standard());
        let target = |year| engine.target_intensity(year).unwrap().0;
        assert_relative_eq!(target(2025), 91.16 * 0.98, max_relative = 1e-12);
        assert_relative_eq!(target(2029), 91.16 * 0.98, max_relative = 1e-12);
        assert_relative_eq!(target(2030), 91.16 * 0.94, max_relative = 1e-12);
        assert_relative_eq!(target(2023), 91.16, max_relative = 1e-12);
        assert_relative_eq!(target(2060), 91.16 * 0.20, max_relative = 1e-12);
    }

    #[test]
    fn test_fossil_heavy_fleet_in_deficit() {
        let engine = FuelEuEngine::new(Registry::standard());
        let result = engine.compute(&fleet_2025()).unwrap();

        let energy = 1e10 * 0.0402 + 1.5e9 * 0.0427 + 2e8 * 0.037 + 5e7 * 0.0199;
        let emissions = 1e10 * 0.0402 * 91.0 + 1.5e9 * 0.0427 * 93.5 + 2e8 * 0.037 * 5.0;
        assert_relative_eq!(result.total_energy, energy, max_relative = 1e-12);
        assert_relative_eq!(result.actual_intensity, emissions / energy, max_relative = 1e-12);
        assert!(result.actual_intensity > result.target_intensity);
        assert!(result.is_deficit);
        assert!(result.raw_balance < 0.0);

        let expected = result.final_balance.abs() / (result.actual_intensity * 41_000.0) * 2400.0;
        assert_relative_eq!(result.penalty, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_banking_clears_deficit() {
        let engine = FuelEuEngine::new(Registry::standard());
        let mut state = fleet_2025();
        let deficit = engine.compute(&state).unwrap().raw_balance;

        state.mechanisms.banking = Mechanism::enabled(-deficit / 1e6 + 1.0);
        let result = engine.compute(&state).unwrap();
        assert!(!result.is_deficit);
        assert_eq!(result.penalty, 0.0);
        assert_relative_eq!(result.balance_tonnes(), 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_banking_flips_all_fossil_fleet() {
        let engine = FuelEuEngine::new(Registry::standard());
        let mut state = all_fossil_2025();
        let before = engine.compute(&state).unwrap();

        let energy = 1e10 * 0.0402 + 1.5e9 * 0.0427;
        let emissions = 1e10 * 0.0402 * 91.0 + 1.5e9 * 0.0427 * 93.5;
        assert_relative_eq!(before.actual_intensity, emissions / energy, max_relative = 1e-12);
        assert!(before.is_deficit);
        assert!(before.penalty > 0.0);

        state.mechanisms.banking = Mechanism::enabled(-before.raw_balance / 1e6 + 1.0);
        let after = engine.compute(&state).unwrap();
        assert_eq!(after.raw_balance, before.raw_balance);
        assert!(!after.is_deficit);
        assert_eq!(after.penalty, 0.0);
        assert_relative_eq!(after.balance_tonnes(), 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_borrowing_cannot_exceed_cap() {
        let engine = FuelEuEngine::new(Registry::standard());
        let mut state = fleet_2025();
        state.mechanisms.borrowing = Mechanism::enabled(1e9);
        let result = engine.compute(&state).unwrap();

        assert_relative_eq!(
            result.borrowing_cap,
            0.02 * result.target_intensity * result.total_energy,
            max_relative = 1e-12
        );
        assert_eq!(result.credits.borrowed, result.borrowing_cap);
        assert_relative_eq!(
            result.final_balance,
            result.raw_balance + result.borrowing_cap,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rfnbo_counts_as_zero_emission() {
        let engine = FuelEuEngine::new(Registry::standard());
        let mut state = fleet_2025();
        state.fuel_mass.clear();
        state.fuel_mass.insert(EnergyCarrier::Rfnbo, 100.0);
        state.year = 2033;
        let result = engine.compute(&state).unwrap();

        assert!(result.total_energy > 0.0);
        assert_eq!(result.total_emissions, 0.0);
        assert!(!result.is_deficit);
    }

    #[test]
    fn test_ice_class_reduces_energy() {
        let engine = FuelEuEngine::new(Registry::standard());
        let mut state = fleet_2025();
        let base = engine.compute(&state).unwrap();
        state.ice_class = true;
        let ice = engine.compute(&state).unwrap();

        assert_relative_eq!(ice.total_energy, base.total_energy * 0.95, max_relative = 1e-12);
        assert_relative_eq!(ice.actual_intensity, base.actual_intensity, max_relative = 1e-12);
    }

    #[test]
    fn test_streak_multiplier() {
        assert_eq!(streak_multiplier(1), 1.0);
        assert_relative_eq!(streak_multiplier(3), 1.2, max_relative = 1e-12);
        assert_relative_eq!(streak_multiplier(10), 1.9, max_relative = 1e-12);
        assert_relative_eq!(streak_multiplier(25), 1.9, max_relative = 1e-12);
        assert_eq!(streak_multiplier(0), 1.0);
    }

    #[test]
    fn test_no_fuel_has_no_penalty() {
        let engine = FuelEuEngine::new(Registry::standard());
        let mut state = fleet_2025();
        state.fuel_mass.clear();
        let result = engine.compute(&state).unwrap();

        assert_eq!(result.actual_intensity, 0.0);
        assert_eq!(result.final_balance, 0.0);
        assert_eq!(result.penalty, 0.0);
    }
}

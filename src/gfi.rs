//! IMO Global Fuel Intensity (Net-Zero Framework) two-tier compliance
//!
//! Attained well-to-wake intensity is compared with a base target and a
//! stricter direct-compliance target. The deficit between the two targets is
//! covered by Tier 1 remedial units; anything above the base target needs
//! Tier 2 units.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::blend::GRAMS_PER_TONNE;
use crate::error::{ensure_non_negative, ensure_percent, Result};
use crate::registry::{FuelType, Registry};

/// 2008 reference intensity (gCO2eq/MJ)
pub const GFI_BASELINE: f64 = 93.3;

/// USD per Tier 1 remedial unit (tCO2eq)
pub const REMEDIAL_PRICE_T1: f64 = 100.0;

/// USD per Tier 2 remedial unit (tCO2eq)
pub const REMEDIAL_PRICE_T2: f64 = 380.0;

/// Zero/near-zero fuel reward threshold (gCO2eq/MJ)
pub const ZNZ_THRESHOLD: f64 = 19.0;
pub const ZNZ_THRESHOLD_2035: f64 = 14.0;
pub const ZNZ_TIGHTENING_YEAR: u32 = 2035;

/// Biofuel blended into one fossil fuel of the inventory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BioSimulation {
    /// Share of the source fuel replaced by biofuel (%)
    pub blend_percent: f64,
    pub source_fuel: FuelType,
}

impl Default for BioSimulation {
    fn default() -> Self {
        Self {
            blend_percent: 0.0,
            source_fuel: FuelType::Vlsfo,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GfiState {
    /// Fuel consumed (MT)
    pub inventory: BTreeMap<FuelType, f64>,
    #[serde(default)]
    pub bio_simulation: BioSimulation,
    pub year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GfiStatus {
    Compliant,
    Tier1Deficit,
    Tier2Deficit,
}

impl fmt::Display for GfiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GfiStatus::Compliant => "COMPLIANT",
            GfiStatus::Tier1Deficit => "TIER_1_DEFICIT",
            GfiStatus::Tier2Deficit => "TIER_2_DEFICIT",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GfiResult {
    pub year: u32,
    /// gCO2eq/MJ
    pub attained: f64,
    pub base_target: f64,
    pub direct_target: f64,
    /// MJ
    pub total_energy: f64,
    /// gCO2eq
    pub total_emissions: f64,
    /// Inventory mass before blending (MT)
    pub total_mass: f64,
    /// Biofuel displacing the source fuel (MT)
    pub bio_mass: f64,
    pub status: GfiStatus,
    /// Tier 1 remedial units (tCO2eq)
    pub tier1_units: f64,
    /// Tier 2 remedial units (tCO2eq)
    pub tier2_units: f64,
    /// USD
    pub penalty: f64,
    pub znz_eligible: bool,
}

/// (base, direct) target intensities for a year
pub fn targets(registry: &Registry, year: u32) -> Result<(f64, f64)> {
    let base = registry.tables.gfi_base_reduction.lookup(year)?;
    let direct = registry.tables.gfi_direct_reduction.lookup(year)?;
    Ok((GFI_BASELINE * (1.0 - base), GFI_BASELINE * (1.0 - direct)))
}

pub fn znz_threshold(year: u32) -> f64 {
    if year >= ZNZ_TIGHTENING_YEAR {
        ZNZ_THRESHOLD_2035
    } else {
        ZNZ_THRESHOLD
    }
}

pub fn compute_gfi(registry: &Registry, state: &GfiState) -> Result<GfiResult> {
    let bio = state.bio_simulation;
    ensure_percent("blend_percent", bio.blend_percent)?;
    let bio_share = bio.blend_percent / 100.0;

    let (base_target, direct_target) = targets(registry, state.year)?;

    let mut total_energy = 0.0;
    let mut total_emissions = 0.0;
    let mut total_mass = 0.0;
    let mut bio_mass = 0.0;

    for (&fuel, &mass) in &state.inventory {
        ensure_non_negative("inventory", mass)?;
        total_mass += mass;

        let factor = registry.fuels.gfi_factor(fuel)?;
        let fossil_mass = if fuel == bio.source_fuel {
            bio_mass = mass * bio_share;
            mass - bio_mass
        } else {
            mass
        };

        total_energy += fossil_mass * GRAMS_PER_TONNE * factor.lcv;
        total_emissions += fossil_mass * GRAMS_PER_TONNE * factor.wtw;
    }

    if bio_mass > 0.0 {
        let biofuel = registry.fuels.gfi_biofuel();
        total_energy += bio_mass * GRAMS_PER_TONNE * biofuel.lcv;
        total_emissions += bio_mass * GRAMS_PER_TONNE * biofuel.wtw;
    }

    let attained = if total_energy > 0.0 {
        total_emissions / total_energy
    } else {
        0.0
    };

    let (status, tier1_units, tier2_units) = if attained <= direct_target {
        (GfiStatus::Compliant, 0.0, 0.0)
    } else if attained <= base_target {
        let t1 = (attained - direct_target) * total_energy / GRAMS_PER_TONNE;
        (GfiStatus::Tier1Deficit, t1, 0.0)
    } else {
        let t1 = (base_target - direct_target) * total_energy / GRAMS_PER_TONNE;
        let t2 = (attained - base_target) * total_energy / GRAMS_PER_TONNE;
        (GfiStatus::Tier2Deficit, t1, t2)
    };

    let penalty = tier1_units * REMEDIAL_PRICE_T1 + tier2_units * REMEDIAL_PRICE_T2;
    let znz_eligible = attained <= znz_threshold(state.year);

    log::debug!(
        "GFI {}: attained={:.3} base={:.3} direct={:.3} status={} penalty={:.2}",
        state.year,
        attained,
        base_target,
        direct_target,
        status,
        penalty
    );

    Ok(GfiResult {
        year: state.year,
        attained,
        base_target,
        direct_target,
        total_energy,
        total_emissions,
        total_mass,
        bio_mass,
        status,
        tier1_units,
        tier2_units,
        penalty,
        znz_eligible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComplianceError;
    use approx::assert_relative_eq;

    fn green_horizon(year: u32) -> GfiState {
        let mut inventory = BTreeMap::new();
        inventory.insert(FuelType::Hfo, 5000.0);
        inventory.insert(FuelType::Vlsfo, 1000.0);
        inventory.insert(FuelType::Mgo, 200.0);
        GfiState {
            inventory,
            bio_simulation: BioSimulation::default(),
            year,
        }
    }

    #[test]
    fn test_targets_ordered() {
        for year in 2028..=2035 {
            let (base, direct) = targets(Registry::standard(), year).unwrap();
            assert!(direct < base, "year {}: direct {} >= base {}", year, direct, base);
        }
        let (base, direct) = targets(Registry::standard(), 2028).unwrap();
        assert_relative_eq!(base, 93.3 * 0.96, max_relative = 1e-12);
        assert_relative_eq!(direct, 93.3 * 0.83, max_relative = 1e-12);
    }

    #[test]
    fn test_years_after_2035_use_final_targets() {
        let late = targets(Registry::standard(), 2040).unwrap();
        let last = targets(Registry::standard(), 2035).unwrap();
        assert_eq!(late, last);
    }

    #[test]
    fn test_year_before_framework_rejected() {
        let result = compute_gfi(Registry::standard(), &green_horizon(2027));
        assert!(matches!(
            result,
            Err(ComplianceError::UnsupportedYear { regime: "GFI", year: 2027 })
        ));
    }

    #[test]
    fn test_tier1_deficit_in_2028() {
        let result = compute_gfi(Registry::standard(), &green_horizon(2028)).unwrap();

        let energy = 5e9 * 0.0405 + 1e9 * 0.041 + 2e8 * 0.0427;
        let emissions = 5e9 * 3.56 + 1e9 * 3.58 + 2e8 * 3.62;
        assert_relative_eq!(result.attained, emissions / energy, max_relative = 1e-12);
        assert_eq!(result.status, GfiStatus::Tier1Deficit);
        assert_eq!(result.tier2_units, 0.0);
        assert_relative_eq!(
            result.tier1_units,
            (result.attained - result.direct_target) * energy / 1e6,
            max_relative = 1e-9
        );
        assert_relative_eq!(result.penalty, result.tier1_units * 100.0, max_relative = 1e-12);
        assert_eq!(result.total_mass, 6200.0);
    }

    #[test]
    fn test_tier2_deficit_in_2035() {
        let result = compute_gfi(Registry::standard(), &green_horizon(2035)).unwrap();

        assert_eq!(result.status, GfiStatus::Tier2Deficit);
        assert!(result.tier2_units > 0.0);
        assert_relative_eq!(
            result.tier1_units,
            (result.base_target - result.direct_target) * result.total_energy / 1e6,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            result.penalty,
            result.tier1_units * 100.0 + result.tier2_units * 380.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_full_bio_blend_is_compliant_and_znz() {
        let mut inventory = BTreeMap::new();
        inventory.insert(FuelType::Vlsfo, 1000.0);
        let state = GfiState {
            inventory,
            bio_simulation: BioSimulation {
                blend_percent: 100.0,
                source_fuel: FuelType::Vlsfo,
            },
            year: 2030,
        };
        let result = compute_gfi(Registry::standard(), &state).unwrap();

        assert_relative_eq!(result.attained, 0.55 / 0.037, max_relative = 1e-12);
        assert_eq!(result.bio_mass, 1000.0);
        assert_eq!(result.status, GfiStatus::Compliant);
        assert_eq!(result.penalty, 0.0);
        assert!(result.znz_eligible);

        let stricter =
            compute_gfi(Registry::standard(), &GfiState { year: 2035, ..state }).unwrap();
        assert!(!stricter.znz_eligible);
    }

    #[test]
    fn test_partial_blend_lowers_attained() {
        let plain = compute_gfi(Registry::standard(), &green_horizon(2030)).unwrap();
        let mut state = green_horizon(2030);
        state.bio_simulation.blend_percent = 50.0;
        let blended = compute_gfi(Registry::standard(), &state).unwrap();

        assert_relative_eq!(blended.bio_mass, 500.0, max_relative = 1e-12);
        assert!(blended.attained < plain.attained);
        assert!(blended.penalty < plain.penalty);
    }

    #[test]
    fn test_empty_inventory_is_compliant() {
        let mut state = green_horizon(2030);
        state.inventory.clear();
        let result = compute_gfi(Registry::standard(), &state).unwrap();
        assert_eq!(result.attained, 0.0);
        assert_eq!(result.status, GfiStatus::Compliant);
    }
}

//! Blended carbon factor for a biofuel + fossil fuel mix
//!
//! The blend Cf is the energy-weighted average of the component carbon
//! factors. A biofuel only earns its own (low) intensity when it is certified
//! and below the sustainability threshold; otherwise it is charged at the
//! fossil fuel's Cf.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ComplianceError, Result};
use crate::registry::{FuelType, Registry};

/// Maximum GHG intensity (gCO2e/MJ) for a biofuel to count as sustainable
pub const SUSTAINABILITY_THRESHOLD: f64 = 33.0;

/// Grams per metric tonne
pub const GRAMS_PER_TONNE: f64 = 1_000_000.0;

/// Biofuel share of a grade-labelled blend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BiofuelGrade {
    B24,
    B30,
    B50,
    B100,
    /// Explicit bio fraction in 0..=1
    Custom(f64),
}

impl BiofuelGrade {
    pub fn bio_fraction(&self) -> f64 {
        match self {
            BiofuelGrade::B24 => 0.24,
            BiofuelGrade::B30 => 0.30,
            BiofuelGrade::B50 => 0.50,
            BiofuelGrade::B100 => 1.00,
            BiofuelGrade::Custom(fraction) => *fraction,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fraction = self.bio_fraction();
        if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
            Ok(())
        } else {
            Err(ComplianceError::InvalidInput { field: "biofuel_grade", value: fraction })
        }
    }
}

/// Split a blended bunker delivery into (biofuel, fossil) masses
pub fn split_by_grade(total_mass: f64, grade: BiofuelGrade) -> Result<(f64, f64)> {
    ensure_non_negative("total_mass", total_mass)?;
    grade.validate()?;
    let bio = total_mass * grade.bio_fraction();
    Ok((bio, total_mass - bio))
}

/// Biofuel part of a blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiofuelComponent {
    /// Mass (MT)
    pub mass: f64,
    /// Lower calorific value (MJ/kg)
    pub lcv: f64,
    /// Well-to-wake GHG intensity (gCO2e/MJ)
    pub ghg_intensity: f64,
    /// Holds a recognised sustainability certificate
    pub is_certified: bool,
}

impl BiofuelComponent {
    /// Back-compute LCV (MJ/kg) from the energy content of a delivery
    pub fn lcv_from_energy(energy_mj: f64, mass_mt: f64) -> f64 {
        if mass_mt > 0.0 {
            energy_mj / (mass_mt * 1000.0)
        } else {
            0.0
        }
    }

    pub fn is_sustainability_compliant(&self) -> bool {
        self.is_certified && self.ghg_intensity <= SUSTAINABILITY_THRESHOLD
    }

    fn validate(&self) -> Result<()> {
        ensure_non_negative("biofuel.mass", self.mass)?;
        ensure_non_negative("biofuel.lcv", self.lcv)?;
        ensure_non_negative("biofuel.ghg_intensity", self.ghg_intensity)
    }
}

/// Fossil part of a blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FossilComponent {
    pub fuel: FuelType,
    /// Mass (MT)
    pub mass: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiofuelBreakdown {
    /// MJ/g
    pub lcv: f64,
    pub mass_g: f64,
    /// MJ
    pub energy: f64,
    pub cf: f64,
    pub ratio: f64,
    pub contribution: f64,
    pub is_sustainability_compliant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FossilBreakdown {
    pub fuel: FuelType,
    /// MJ/g
    pub lcv: f64,
    pub mass_g: f64,
    /// MJ
    pub energy: f64,
    pub cf: f64,
    pub ratio: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendTotals {
    pub mass_g: f64,
    pub energy: f64,
    pub blended_cf: f64,
}

/// Every intermediate term of a blend calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendResult {
    pub biofuel: BiofuelBreakdown,
    pub fossil: FossilBreakdown,
    pub total: BlendTotals,
}

impl BlendResult {
    pub fn blended_cf(&self) -> f64 {
        self.total.blended_cf
    }
}

/// Compute the energy-weighted blended Cf
pub fn compute_blend(
    registry: &Registry,
    biofuel: &BiofuelComponent,
    fossil: &FossilComponent,
) -> Result<BlendResult> {
    biofuel.validate()?;
    ensure_non_negative("fossil.mass", fossil.mass)?;

    let standard = registry.fuels.standard_for(fossil.fuel)?;

    let bio_lcv = biofuel.lcv / 1000.0;
    let bio_mass_g = biofuel.mass * GRAMS_PER_TONNE;
    let fossil_mass_g = fossil.mass * GRAMS_PER_TONNE;

    let compliant = biofuel.is_sustainability_compliant();
    let bio_cf = if compliant {
        biofuel.ghg_intensity * bio_lcv
    } else {
        log::warn!(
            "biofuel not sustainability compliant (certified={}, intensity={}); charging {} Cf {}",
            biofuel.is_certified,
            biofuel.ghg_intensity,
            fossil.fuel,
            standard.cf
        );
        standard.cf
    }
    .max(0.0);

    let bio_energy = bio_mass_g * bio_lcv;
    let fossil_energy = fossil_mass_g * standard.lcv;
    let total_energy = bio_energy + fossil_energy;

    let (bio_ratio, fossil_ratio) = if total_energy > 0.0 {
        (bio_energy / total_energy, fossil_energy / total_energy)
    } else {
        (0.0, 0.0)
    };

    let bio_contribution = bio_ratio * bio_cf;
    let fossil_contribution = fossil_ratio * standard.cf;
    let blended_cf = bio_contribution + fossil_contribution;

    log::debug!(
        "blend: bio_ratio={:.4} fossil_ratio={:.4} blended_cf={:.4}",
        bio_ratio,
        fossil_ratio,
        blended_cf
    );

    Ok(BlendResult {
        biofuel: BiofuelBreakdown {
            lcv: bio_lcv,
            mass_g: bio_mass_g,
            energy: bio_energy,
            cf: bio_cf,
            ratio: bio_ratio,
            contribution: bio_contribution,
            is_sustainability_compliant: compliant,
        },
        fossil: FossilBreakdown {
            fuel: fossil.fuel,
            lcv: standard.lcv,
            mass_g: fossil_mass_g,
            energy: fossil_energy,
            cf: standard.cf,
            ratio: fossil_ratio,
            contribution: fossil_contribution,
        },
        total: BlendTotals {
            mass_g: bio_mass_g + fossil_mass_g,
            energy: total_energy,
            blended_cf,
        },
    })
}

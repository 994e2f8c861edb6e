//! Banking, borrowing and pooling adjustments to a compliance balance

use serde::{Deserialize, Serialize};

use crate::blend::GRAMS_PER_TONNE;
use crate::error::{ensure_non_negative, ComplianceError, Result};

/// Borrowing is capped at this share of target intensity × energy used
pub const BORROWING_CAP_SHARE: f64 = 0.02;

/// A flexibility mechanism with an amount in tonnes CO2eq
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mechanism {
    pub enabled: bool,
    pub amount_tonnes: f64,
}

impl Mechanism {
    pub fn enabled(amount_tonnes: f64) -> Self {
        Self { enabled: true, amount_tonnes }
    }

    /// Contribution in gCO2eq; zero when disabled
    pub fn grams(&self) -> f64 {
        if self.enabled {
            self.amount_tonnes * GRAMS_PER_TONNE
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceMechanisms {
    /// Surplus banked from an earlier period
    pub banking: Mechanism,
    /// Advance surplus taken from the next period
    pub borrowing: Mechanism,
    /// Net balance received from a compliance pool (negative when giving)
    pub pooling: Mechanism,
}

/// Grams actually credited by each mechanism
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MechanismCredits {
    pub banked: f64,
    pub borrowed: f64,
    pub pooled: f64,
}

impl MechanismCredits {
    pub fn total(&self) -> f64 {
        self.banked + self.borrowed + self.pooled
    }
}

impl ComplianceMechanisms {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("banking.amount_tonnes", self.banking.amount_tonnes)?;
        ensure_non_negative("borrowing.amount_tonnes", self.borrowing.amount_tonnes)?;
        if !self.pooling.amount_tonnes.is_finite() {
            return Err(ComplianceError::InvalidInput {
                field: "pooling.amount_tonnes",
                value: self.pooling.amount_tonnes,
            });
        }
        Ok(())
    }

    /// Credits applied on top of the raw balance; borrowing is limited to
    /// `borrowing_cap` grams
    pub fn credits(&self, borrowing_cap: f64) -> MechanismCredits {
        let requested = self.borrowing.grams();
        let borrowed = requested.min(borrowing_cap);
        if borrowed < requested {
            log::debug!(
                "borrowing of {:.0} g capped at {:.0} g",
                requested,
                borrowing_cap
            );
        }

        MechanismCredits {
            banked: self.banking.grams(),
            borrowed,
            pooled: self.pooling.grams(),
        }
    }
}

/// Cap on borrowed surplus (g) for a period
pub fn borrowing_cap(target_intensity: f64, total_energy: f64) -> f64 {
    target_intensity * total_energy * BORROWING_CAP_SHARE
}

//! FuelEU Maritime compliance balance, flexibility mechanisms and penalty

mod engine;
pub mod mechanisms;

pub use engine::{
    streak_multiplier, CarrierBreakdown, FuelEuEngine, FuelEuResult, FuelEuState,
    BASELINE_INTENSITY, PENALTY_RATE, RFNBO_REWARD_LAST_YEAR, VLSFO_ENERGY_DENSITY,
};
pub use mechanisms::{ComplianceMechanisms, Mechanism, MechanismCredits};

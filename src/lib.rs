//! Maritime Compliance - calculation engines for shipping GHG regulations
//!
//! This library provides:
//! - Blended carbon factor for biofuel/fossil fuel mixes
//! - IMO CII attained/required intensity, A-E rating and what-if simulation
//! - Corrective action plan aggregation over monthly logs
//! - EU ETS allowance liability per voyage
//! - FuelEU Maritime compliance balance, flexibility mechanisms and penalty
//! - IMO GFI two-tier remedial-unit penalty

pub mod error;
pub mod registry;
pub mod blend;
pub mod cii;
pub mod ets;
pub mod fueleu;
pub mod gfi;
pub mod scenario;

// Re-export commonly used types
pub use error::{ComplianceError, Result};
pub use registry::{EnergyCarrier, FuelType, Registry, ShipType};
pub use blend::{compute_blend, BiofuelComponent, BiofuelGrade, BlendResult, FossilComponent};
pub use cii::{CapAggregator, CiiEngine, CiiInput, CiiResult, EfficiencyMeasures, Rating};
pub use ets::{compute_ets, VoyageRecord, VoyageScope};
pub use fueleu::{FuelEuEngine, FuelEuState};
pub use gfi::{compute_gfi, GfiState, GfiStatus};
pub use scenario::ComplianceRunner;

//! IMO Carbon Intensity Indicator: rating, what-if simulation and the
//! corrective action plan aggregation

mod engine;
mod rating;
mod simulation;
pub mod cap;

pub use cap::{
    AnnualBaseline, CapAggregator, CapInput, CapResult, FuelLedgerItem, MonthlyAverages,
    MonthlyLog, TrajectoryPoint, reconcile, sync_annual_to_monthly,
};
pub use engine::{CiiEngine, CiiInput, CiiResult};
pub use rating::{BandLimits, Rating};
pub use simulation::{CiiSimulation, EfficiencyMeasures, BIOFUEL_LIFECYCLE_REDUCTION};

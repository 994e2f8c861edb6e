//! Error taxonomy for the calculation engines
//!
//! Degenerate arithmetic (zero mass, zero distance, zero energy) is not an
//! error: every engine has an explicit zero-result policy for it. Errors are
//! reserved for inputs the registry cannot price and for physically invalid
//! quantities rejected at the boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Unsupported fuel category: {0}")]
    UnsupportedFuel(String),

    #[error("Unsupported ship type: {0}")]
    UnsupportedShipType(String),

    #[error("Year {year} is outside the {regime} regulatory table")]
    UnsupportedYear { regime: &'static str, year: u32 },

    #[error("Invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ComplianceError>;

/// Reject negative or non-finite physical quantities.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ComplianceError::InvalidInput { field, value })
    }
}

/// Reject percentages outside 0..=100.
pub(crate) fn ensure_percent(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ComplianceError::InvalidInput { field, value })
    }
}

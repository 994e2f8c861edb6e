//! A–E operational carbon intensity rating

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::CiiCoefficients;

/// Consecutive D ratings that trigger a corrective action plan
pub const CORRECTIVE_ACTION_D_YEARS: u32 = 3;

/// CII rating, ordered from best (A) to worst (E)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    A,
    B,
    C,
    D,
    E,
}

impl Rating {
    /// Rate a ship from its attained/required ratio
    pub fn from_ratio(ratio: f64, boundaries: &CiiCoefficients) -> Self {
        if ratio <= boundaries.d1 {
            Rating::A
        } else if ratio <= boundaries.d2 {
            Rating::B
        } else if ratio <= boundaries.d3 {
            Rating::C
        } else if ratio <= boundaries.d4 {
            Rating::D
        } else {
            Rating::E
        }
    }

    /// D or E
    pub fn is_inferior_rating(&self) -> bool {
        matches!(self, Rating::D | Rating::E)
    }

    /// E once, or D for three consecutive years, triggers a corrective action plan.
    /// `consecutive_d_years` counts the current year.
    pub fn requires_corrective_action(&self, consecutive_d_years: u32) -> bool {
        match self {
            Rating::E => true,
            Rating::D => consecutive_d_years >= CORRECTIVE_ACTION_D_YEARS,
            _ => false,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
            Rating::E => "E",
        };
        f.write_str(letter)
    }
}

/// Upper CII limits of the A..D bands for one required CII
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandLimits {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl BandLimits {
    pub fn new(required: f64, boundaries: &CiiCoefficients) -> Self {
        Self {
            a: required * boundaries.d1,
            b: required * boundaries.d2,
            c: required * boundaries.d3,
            d: required * boundaries.d4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk() -> CiiCoefficients {
        CiiCoefficients::new(4745.0, 0.622, 0.86, 0.94, 1.06, 1.18)
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let k = bulk();
        assert_eq!(Rating::from_ratio(0.86, &k), Rating::A);
        assert_eq!(Rating::from_ratio(0.8601, &k), Rating::B);
        assert_eq!(Rating::from_ratio(0.94, &k), Rating::B);
        assert_eq!(Rating::from_ratio(1.06, &k), Rating::C);
        assert_eq!(Rating::from_ratio(1.18, &k), Rating::D);
        assert_eq!(Rating::from_ratio(1.19, &k), Rating::E);
    }

    #[test]
    fn test_rating_order() {
        assert!(Rating::A < Rating::B);
        assert!(Rating::D < Rating::E);
        assert!(Rating::D.is_inferior_rating());
        assert!(!Rating::C.is_inferior_rating());
    }

    #[test]
    fn test_single_d_needs_no_plan() {
        assert!(!Rating::D.requires_corrective_action(1));
        assert!(!Rating::D.requires_corrective_action(2));
        assert!(Rating::D.requires_corrective_action(3));
        assert!(Rating::E.requires_corrective_action(0));
        assert!(!Rating::C.requires_corrective_action(5));
    }

    #[test]
    fn test_band_limits() {
        let limits = BandLimits::new(5.0, &bulk());
        assert!((limits.a - 4.3).abs() < 1e-12);
        assert!((limits.d - 5.9).abs() < 1e-12);
    }
}

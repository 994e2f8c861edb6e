//! Year-indexed regulatory tables with explicit extrapolation policies
//!
//! Regulators publish reduction factors for selected years only. A lookup
//! returns the value of the largest defined year that is <= the requested
//! year (a step function). Requests before the first or after the last
//! defined year are resolved by the table's `Extrapolation` policy instead of
//! ad-hoc defaults in each engine.

use std::collections::BTreeMap;

use crate::error::{ComplianceError, Result};

/// What a lookup returns outside the defined year range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extrapolation {
    /// Use the nearest defined year's value
    Clamp,
    /// Use a fixed value
    Fallback(f64),
    /// Reject the year with `ComplianceError::UnsupportedYear`
    Fail,
}

/// Sparse step table keyed by calendar year
#[derive(Debug, Clone)]
pub struct YearTable {
    /// Regime label used in error messages
    regime: &'static str,
    values: BTreeMap<u32, f64>,
    before: Extrapolation,
    after: Extrapolation,
}

impl YearTable {
    pub fn new(
        regime: &'static str,
        entries: &[(u32, f64)],
        before: Extrapolation,
        after: Extrapolation,
    ) -> Self {
        Self {
            regime,
            values: entries.iter().copied().collect(),
            before,
            after,
        }
    }

    /// Replace the defined values, keeping the extrapolation policies
    pub fn with_values(&self, entries: &[(u32, f64)]) -> Self {
        Self::new(self.regime, entries, self.before, self.after)
    }

    pub fn regime(&self) -> &'static str {
        self.regime
    }

    pub fn first_year(&self) -> Option<u32> {
        self.values.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<u32> {
        self.values.keys().next_back().copied()
    }

    /// Defined (year, value) pairs in ascending year order
    pub fn entries(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.values.iter().map(|(&y, &v)| (y, v))
    }

    /// Step lookup with the table's extrapolation policy
    pub fn lookup(&self, year: u32) -> Result<f64> {
        let (first, last) = match (self.first_year(), self.last_year()) {
            (Some(first), Some(last)) => (first, last),
            _ => return self.extrapolate(self.before, year, None),
        };

        if year < first {
            return self.extrapolate(self.before, year, self.values.get(&first).copied());
        }
        if year > last {
            return self.extrapolate(self.after, year, self.values.get(&last).copied());
        }

        // year lies inside [first, last], so a key <= year always exists
        let value = self
            .values
            .range(..=year)
            .next_back()
            .map(|(_, &v)| v)
            .unwrap_or_default();
        Ok(value)
    }

    fn extrapolate(&self, policy: Extrapolation, year: u32, nearest: Option<f64>) -> Result<f64> {
        match (policy, nearest) {
            (Extrapolation::Clamp, Some(v)) => Ok(v),
            (Extrapolation::Fallback(v), _) => Ok(v),
            _ => Err(ComplianceError::UnsupportedYear {
                regime: self.regime,
                year,
            }),
        }
    }
}

/// All year-indexed tables consumed by the engines
#[derive(Debug, Clone)]
pub struct RegulatoryTables {
    /// CII reduction factor Z in percent
    pub cii_reduction: YearTable,
    /// EU ETS surrender phase-in multiplier
    pub ets_phase_in: YearTable,
    /// FuelEU GHG-intensity reduction as a fraction of the 2020 baseline
    pub fueleu_reduction: YearTable,
    /// GFI base-target reduction as a fraction of the 2008 baseline
    pub gfi_base_reduction: YearTable,
    /// GFI direct-compliance reduction as a fraction of the 2008 baseline
    pub gfi_direct_reduction: YearTable,
}

impl RegulatoryTables {
    /// CII Z factors, 2023-2030. Years without a factor use Z = 0.
    pub fn default_cii_reduction() -> YearTable {
        YearTable::new(
            "CII",
            &[
                (2023, 5.0),
                (2024, 7.0),
                (2025, 9.0),
                (2026, 11.0),
                (2027, 13.0),
                (2028, 15.0),
                (2029, 17.0),
                (2030, 19.0),
            ],
            Extrapolation::Fallback(0.0),
            Extrapolation::Fallback(0.0),
        )
    }

    /// Maritime ETS obligations start in 2024; full surrender from 2026
    pub fn default_ets_phase_in() -> YearTable {
        YearTable::new(
            "EU ETS",
            &[(2024, 0.4), (2025, 0.7), (2026, 1.0)],
            Extrapolation::Fail,
            Extrapolation::Clamp,
        )
    }

    pub fn default_fueleu_reduction() -> YearTable {
        YearTable::new(
            "FuelEU",
            &[
                (2024, 0.0),
                (2025, 0.02),
                (2030, 0.06),
                (2035, 0.145),
                (2040, 0.31),
                (2045, 0.62),
                (2050, 0.80),
            ],
            Extrapolation::Fallback(0.0),
            Extrapolation::Clamp,
        )
    }

    pub fn default_gfi_base_reduction() -> YearTable {
        YearTable::new(
            "GFI",
            &[
                (2028, 0.04),
                (2029, 0.06),
                (2030, 0.08),
                (2031, 0.124),
                (2032, 0.168),
                (2033, 0.212),
                (2034, 0.256),
                (2035, 0.30),
            ],
            Extrapolation::Fail,
            Extrapolation::Clamp,
        )
    }

    pub fn default_gfi_direct_reduction() -> YearTable {
        YearTable::new(
            "GFI",
            &[
                (2028, 0.17),
                (2029, 0.19),
                (2030, 0.21),
                (2031, 0.254),
                (2032, 0.298),
                (2033, 0.342),
                (2034, 0.386),
                (2035, 0.43),
            ],
            Extrapolation::Fail,
            Extrapolation::Clamp,
        )
    }

    /// Check that the base target stays looser than the direct target.
    pub fn validate(&self) -> Result<()> {
        for (year, base) in self.gfi_base_reduction.entries() {
            let direct = self.gfi_direct_reduction.lookup(year)?;
            if base >= direct {
                return Err(ComplianceError::InvalidRegistry(format!(
                    "GFI base reduction {} must be below direct reduction {} in {}",
                    base, direct, year
                )));
            }
        }
        Ok(())
    }
}

impl Default for RegulatoryTables {
    fn default() -> Self {
        Self {
            cii_reduction: Self::default_cii_reduction(),
            ets_phase_in: Self::default_ets_phase_in(),
            fueleu_reduction: Self::default_fueleu_reduction(),
            gfi_base_reduction: Self::default_gfi_base_reduction(),
            gfi_direct_reduction: Self::default_gfi_direct_reduction(),
        }
    }
}

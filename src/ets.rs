//! EU Emissions Trading System allowance liability for a voyage
//!
//! CO2-equivalent emissions are scoped by where the voyage starts and ends,
//! then scaled by the maritime phase-in factor of the reporting year.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::blend::BiofuelGrade;
use crate::error::{ensure_non_negative, Result};
use crate::registry::{FuelType, Registry};

/// First and last reporting years a departure date can be mapped to
pub const FIRST_REPORTING_YEAR: i32 = 2024;
pub const LAST_REPORTING_YEAR: i32 = 2030;

/// Share of voyage emissions that falls under the EU ETS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoyageScope {
    IntraEu,
    Inbound,
    Outbound,
    OutOfScope,
}

impl VoyageScope {
    pub fn from_endpoints(origin_is_eu: bool, destination_is_eu: bool) -> Self {
        match (origin_is_eu, destination_is_eu) {
            (true, true) => VoyageScope::IntraEu,
            (false, true) => VoyageScope::Inbound,
            (true, false) => VoyageScope::Outbound,
            (false, false) => VoyageScope::OutOfScope,
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            VoyageScope::IntraEu => 1.0,
            VoyageScope::Inbound | VoyageScope::Outbound => 0.5,
            VoyageScope::OutOfScope => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VoyageScope::IntraEu => "Intra-EU",
            VoyageScope::Inbound => "Inbound",
            VoyageScope::Outbound => "Outbound",
            VoyageScope::OutOfScope => "Out of scope",
        }
    }
}

impl fmt::Display for VoyageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Biofuel blend bunkered on top of a fossil base fuel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiofuelBlendRow {
    /// MT of blended product
    pub mass: f64,
    pub grade: BiofuelGrade,
    pub base_fuel: FuelType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageRecord {
    pub origin_is_eu: bool,
    pub destination_is_eu: bool,
    /// Fossil fuel burned (MT)
    #[serde(default)]
    pub fuel_mass: BTreeMap<FuelType, f64>,
    #[serde(default)]
    pub biofuel: Option<BiofuelBlendRow>,
    pub year: u32,
    /// EUR per allowance
    pub eua_price: f64,
}

/// Emissions of one fuel row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtsFuelRow {
    pub fuel: FuelType,
    /// Mass charged at the fossil factor (MT)
    pub chargeable_mass: f64,
    /// tCO2e per tonne of fuel
    pub co2eq_factor: f64,
    /// tCO2e
    pub emissions: f64,
    pub is_biofuel_blend: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtsResult {
    pub rows: Vec<EtsFuelRow>,
    /// tCO2e
    pub total_co2e: f64,
    pub scope: VoyageScope,
    pub scope_factor: f64,
    pub phase_in: f64,
    /// Allowances to surrender (one EUA per tCO2e)
    pub eua_to_surrender: f64,
    /// EUR
    pub financial_impact: f64,
    /// tCO2e kept out of scope by the bio share of the blend
    pub biofuel_avoided_co2e: f64,
    /// Allowances not surrendered thanks to the blend
    pub biofuel_avoided_eua: f64,
    /// EUR
    pub biofuel_savings: f64,
}

/// Allowance liability of one voyage
pub fn compute_ets(registry: &Registry, voyage: &VoyageRecord) -> Result<EtsResult> {
    ensure_non_negative("eua_price", voyage.eua_price)?;

    let mut rows = Vec::with_capacity(voyage.fuel_mass.len() + 1);
    let mut biofuel_avoided_co2e = 0.0;
    for (&fuel, &mass) in &voyage.fuel_mass {
        ensure_non_negative("fuel_mass", mass)?;
        let factor = registry.fuels.ets_components(fuel)?.co2eq();
        rows.push(EtsFuelRow {
            fuel,
            chargeable_mass: mass,
            co2eq_factor: factor,
            emissions: mass * factor,
            is_biofuel_blend: false,
        });
    }

    if let Some(blend) = &voyage.biofuel {
        ensure_non_negative("biofuel.mass", blend.mass)?;
        blend.grade.validate()?;
        let factor = registry.fuels.ets_components(blend.base_fuel)?.co2eq();
        let chargeable = blend.mass * (1.0 - blend.grade.bio_fraction());
        biofuel_avoided_co2e = blend.mass * blend.grade.bio_fraction() * factor;
        rows.push(EtsFuelRow {
            fuel: blend.base_fuel,
            chargeable_mass: chargeable,
            co2eq_factor: factor,
            emissions: chargeable * factor,
            is_biofuel_blend: true,
        });
    }

    let total_co2e: f64 = rows.iter().map(|row| row.emissions).sum();
    let scope = VoyageScope::from_endpoints(voyage.origin_is_eu, voyage.destination_is_eu);
    let phase_in = registry.tables.ets_phase_in.lookup(voyage.year)?;
    let eua_to_surrender = total_co2e * scope.factor() * phase_in;
    let biofuel_avoided_eua = biofuel_avoided_co2e * scope.factor() * phase_in;

    log::debug!(
        "ETS {} {}: total={:.2} tCO2e scope={} phase_in={} EUA={:.2}",
        voyage.year,
        scope,
        total_co2e,
        scope.factor(),
        phase_in,
        eua_to_surrender
    );

    Ok(EtsResult {
        rows,
        total_co2e,
        scope,
        scope_factor: scope.factor(),
        phase_in,
        eua_to_surrender,
        financial_impact: eua_to_surrender * voyage.eua_price,
        biofuel_avoided_co2e,
        biofuel_avoided_eua,
        biofuel_savings: biofuel_avoided_eua * voyage.eua_price,
    })
}

/// Reporting year implied by a departure timestamp, when it falls in the
/// supported window
pub fn reporting_year(departure: NaiveDateTime) -> Option<u32> {
    let year = departure.year();
    if (FIRST_REPORTING_YEAR..=LAST_REPORTING_YEAR).contains(&year) {
        u32::try_from(year).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComplianceError;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn shanghai_rotterdam() -> VoyageRecord {
        let mut fuel_mass = BTreeMap::new();
        fuel_mass.insert(FuelType::Hfo, 1200.0);
        VoyageRecord {
            origin_is_eu: false,
            destination_is_eu: true,
            fuel_mass,
            biofuel: Some(BiofuelBlendRow {
                mass: 100.0,
                grade: BiofuelGrade::B30,
                base_fuel: FuelType::Mgo,
            }),
            year: 2026,
            eua_price: 85.0,
        }
    }

    #[test]
    fn test_scope_is_total() {
        assert_eq!(VoyageScope::from_endpoints(true, true).factor(), 1.0);
        assert_eq!(VoyageScope::from_endpoints(false, true).factor(), 0.5);
        assert_eq!(VoyageScope::from_endpoints(true, false).factor(), 0.5);
        assert_eq!(VoyageScope::from_endpoints(false, false).factor(), 0.0);
    }

    #[test]
    fn test_inbound_voyage_with_blend() {
        let result = compute_ets(Registry::standard(), &shanghai_rotterdam()).unwrap();

        let hfo = 3.114 + 0.00005 * 28.0 + 0.00018 * 265.0;
        let mgo = 3.206 + 0.00005 * 28.0 + 0.00018 * 265.0;
        let total = 1200.0 * hfo + 70.0 * mgo;

        assert_eq!(result.rows.len(), 2);
        assert!(result.rows[1].is_biofuel_blend);
        assert_relative_eq!(result.rows[1].chargeable_mass, 70.0, max_relative = 1e-12);
        assert_relative_eq!(result.total_co2e, total, max_relative = 1e-12);
        assert_eq!(result.scope, VoyageScope::Inbound);
        assert_eq!(result.phase_in, 1.0);
        assert_relative_eq!(result.eua_to_surrender, total * 0.5, max_relative = 1e-12);
        assert_relative_eq!(result.financial_impact, total * 0.5 * 85.0, max_relative = 1e-12);

        // 30 MT of the B30 blend is biofuel priced off the MGO base
        assert_relative_eq!(result.biofuel_avoided_co2e, 30.0 * mgo, max_relative = 1e-12);
        assert_relative_eq!(result.biofuel_avoided_eua, 30.0 * mgo * 0.5, max_relative = 1e-12);
        assert_relative_eq!(result.biofuel_savings, 30.0 * mgo * 0.5 * 85.0, max_relative = 1e-12);
    }

    #[test]
    fn test_no_blend_saves_nothing() {
        let mut voyage = shanghai_rotterdam();
        voyage.biofuel = None;
        let result = compute_ets(Registry::standard(), &voyage).unwrap();
        assert_eq!(result.biofuel_avoided_co2e, 0.0);
        assert_eq!(result.biofuel_savings, 0.0);
    }

    #[test]
    fn test_phase_in_years() {
        let mut voyage = shanghai_rotterdam();
        voyage.year = 2024;
        assert_eq!(compute_ets(Registry::standard(), &voyage).unwrap().phase_in, 0.4);
        voyage.year = 2025;
        assert_eq!(compute_ets(Registry::standard(), &voyage).unwrap().phase_in, 0.7);
        voyage.year = 2040;
        assert_eq!(compute_ets(Registry::standard(), &voyage).unwrap().phase_in, 1.0);
    }

    #[test]
    fn test_year_before_scheme_rejected() {
        let mut voyage = shanghai_rotterdam();
        voyage.year = 2023;
        assert!(matches!(
            compute_ets(Registry::standard(), &voyage),
            Err(ComplianceError::UnsupportedYear { year: 2023, .. })
        ));
    }

    #[test]
    fn test_out_of_scope_owes_nothing() {
        let mut voyage = shanghai_rotterdam();
        voyage.destination_is_eu = false;
        let result = compute_ets(Registry::standard(), &voyage).unwrap();
        assert!(result.total_co2e > 0.0);
        assert_eq!(result.eua_to_surrender, 0.0);
        assert_eq!(result.financial_impact, 0.0);
    }

    #[test]
    fn test_pure_biofuel_is_free() {
        let mut voyage = shanghai_rotterdam();
        voyage.fuel_mass.clear();
        voyage.biofuel = Some(BiofuelBlendRow {
            mass: 500.0,
            grade: BiofuelGrade::B100,
            base_fuel: FuelType::Vlsfo,
        });
        let result = compute_ets(Registry::standard(), &voyage).unwrap();
        assert_eq!(result.total_co2e, 0.0);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut voyage = shanghai_rotterdam();
        voyage.eua_price = -1.0;
        assert!(compute_ets(Registry::standard(), &voyage).is_err());
    }

    #[test]
    fn test_reporting_year_window() {
        let departure = NaiveDate::from_ymd_opt(2027, 3, 14)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(reporting_year(departure), Some(2027));

        let early = NaiveDate::from_ymd_opt(2019, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(reporting_year(early), None);
    }
}

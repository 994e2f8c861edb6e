//! Compliance runner for repeated calculations
//!
//! Holds one registry and exposes every engine behind a single entry point,
//! so callers can run many voyages, ships or what-if cases without
//! re-reading CSV files.

use std::path::Path;

use rayon::prelude::*;

use crate::blend::{compute_blend, BiofuelComponent, BlendResult, FossilComponent};
use crate::cii::{
    CapAggregator, CapInput, CapResult, CiiEngine, CiiInput, CiiResult, CiiSimulation,
    EfficiencyMeasures,
};
use crate::error::Result;
use crate::ets::{compute_ets, EtsResult, VoyageRecord};
use crate::fueleu::{FuelEuEngine, FuelEuResult, FuelEuState};
use crate::gfi::{compute_gfi, GfiResult, GfiState};
use crate::registry::Registry;

/// Pre-loaded compliance runner
///
/// # Example
/// ```ignore
/// let runner = ComplianceRunner::from_csv()?;
///
/// for year in 2024..=2030 {
///     let input = CiiInput { year, ..base.clone() };
///     let result = runner.cii(&input)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ComplianceRunner {
    registry: Registry,
}

impl ComplianceRunner {
    /// Create runner with the in-code regulatory defaults
    pub fn new() -> Self {
        Self {
            registry: Registry::default_regulatory(),
        }
    }

    /// Create runner by loading the registry from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            registry: Registry::from_csv()?,
        })
    }

    /// Create runner from a specific registry directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self {
            registry: Registry::from_csv_path(path)?,
        })
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn blend(
        &self,
        biofuel: &BiofuelComponent,
        fossil: &FossilComponent,
    ) -> Result<BlendResult> {
        compute_blend(&self.registry, biofuel, fossil)
    }

    pub fn cii(&self, input: &CiiInput) -> Result<CiiResult> {
        CiiEngine::new(&self.registry).compute(input)
    }

    /// Rate many ships in parallel; results keep the input order
    pub fn cii_batch(&self, inputs: &[CiiInput]) -> Vec<Result<CiiResult>> {
        let engine = CiiEngine::new(&self.registry);
        inputs.par_iter().map(|input| engine.compute(input)).collect()
    }

    pub fn simulate(
        &self,
        input: &CiiInput,
        measures: &EfficiencyMeasures,
    ) -> Result<CiiSimulation> {
        CiiEngine::new(&self.registry).simulate(input, measures)
    }

    /// Run several what-if measure sets against one ship
    pub fn simulate_scenarios(
        &self,
        input: &CiiInput,
        scenarios: &[EfficiencyMeasures],
    ) -> Result<Vec<CiiSimulation>> {
        let engine = CiiEngine::new(&self.registry);
        scenarios
            .iter()
            .map(|measures| engine.simulate(input, measures))
            .collect()
    }

    pub fn cap(&self, input: &CapInput) -> Result<CapResult> {
        CapAggregator::new(CiiEngine::new(&self.registry)).aggregate(input)
    }

    pub fn ets(&self, voyage: &VoyageRecord) -> Result<EtsResult> {
        compute_ets(&self.registry, voyage)
    }

    pub fn fueleu(&self, state: &FuelEuState) -> Result<FuelEuResult> {
        FuelEuEngine::new(&self.registry).compute(state)
    }

    pub fn gfi(&self, state: &GfiState) -> Result<GfiResult> {
        compute_gfi(&self.registry, state)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry for what-if coefficient changes
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}

impl Default for ComplianceRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FuelType, ShipType};
    use std::collections::BTreeMap;

    fn bulk_carrier(year: u32) -> CiiInput {
        let mut fuel_mass = BTreeMap::new();
        fuel_mass.insert(FuelType::Hfo, 4500.0);
        fuel_mass.insert(FuelType::Mgo, 250.0);
        CiiInput {
            ship_type: ShipType::BulkCarrier,
            dwt: 62_000.0,
            distance: 60_045.0,
            fuel_mass,
            year,
        }
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = ComplianceRunner::new();
        let inputs: Vec<_> = (2023..=2030).map(bulk_carrier).collect();

        let batch = runner.cii_batch(&inputs);
        assert_eq!(batch.len(), 8);
        for (input, result) in inputs.iter().zip(&batch) {
            let single = runner.cii(input).unwrap();
            let batched = result.as_ref().unwrap();
            assert_eq!(batched.year, input.year);
            assert_eq!(batched.attained, single.attained);
            assert_eq!(batched.rating, single.rating);
        }
    }

    #[test]
    fn test_scenarios_rank_by_savings() {
        let runner = ComplianceRunner::default();
        let scenarios = [
            EfficiencyMeasures::default(),
            EfficiencyMeasures {
                hull_coating: true,
                ..Default::default()
            },
            EfficiencyMeasures {
                hull_coating: true,
                biofuel_percent: 30.0,
                ..Default::default()
            },
        ];

        let results = runner.simulate_scenarios(&bulk_carrier(2026), &scenarios).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].co2_savings, 0.0);
        assert!(results[2].co2_savings > results[1].co2_savings);
    }

    #[test]
    fn test_registry_override_changes_results() {
        let mut runner = ComplianceRunner::new();
        let before = runner.cii(&bulk_carrier(2026)).unwrap();

        let mut standards = std::collections::HashMap::new();
        for fuel in FuelType::ALL {
            let mut standard = runner.registry().fuels.standard_for(fuel).unwrap().clone();
            standard.cf *= 0.5;
            standards.insert(fuel, standard);
        }
        runner.registry_mut().fuels.set_standards(standards);

        let after = runner.cii(&bulk_carrier(2026)).unwrap();
        assert!((after.co2 - before.co2 * 0.5).abs() < 1e-6);
    }
}

//! Static regulatory registry: fuel coefficients, ship coefficients and
//! year-indexed reduction tables shared by every engine

mod fuels;
mod ships;
mod tables;
pub mod loader;

pub use fuels::{
    EnergyCarrier, FuelRegistry, FuelStandard, FuelType, GfiFactor, GhgComponents, WtwIntensity,
    GWP_CH4, GWP_N2O,
};
pub use loader::LoadedRegistry;
pub use ships::{CiiCoefficients, ShipRegistry, ShipType};
pub use tables::{Extrapolation, RegulatoryTables, YearTable};

use std::path::Path;
use std::sync::OnceLock;

use crate::error::Result;

/// Container for all regulatory coefficients
#[derive(Debug, Clone)]
pub struct Registry {
    pub fuels: FuelRegistry,
    pub ships: ShipRegistry,
    pub tables: RegulatoryTables,
}

impl Registry {
    /// Create registry with the in-code regulatory defaults
    pub fn default_regulatory() -> Self {
        Self {
            fuels: FuelRegistry::standard(),
            ships: ShipRegistry::standard(),
            tables: RegulatoryTables::default(),
        }
    }

    /// Shared read-only instance of the default registry, built once
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(Self::default_regulatory)
    }

    /// Load registry from CSV files in the default location (data/registry/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_REGISTRY_PATH))
    }

    /// Load registry from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedRegistry::load_from(path)?;
        let registry = Self::from_loaded(&loaded);
        registry.validate()?;
        Ok(registry)
    }

    /// Overlay loaded tables on the defaults; extrapolation policies stay in code
    pub fn from_loaded(loaded: &LoadedRegistry) -> Self {
        let mut registry = Self::default_regulatory();
        registry.fuels.set_standards(loaded.fuel_standards.clone());
        registry.ships = ShipRegistry::from_map(loaded.ship_coefficients.clone());

        let tables = &mut registry.tables;
        tables.cii_reduction = tables.cii_reduction.with_values(&loaded.cii_reduction);
        tables.ets_phase_in = tables.ets_phase_in.with_values(&loaded.ets_phase_in);
        tables.fueleu_reduction = tables.fueleu_reduction.with_values(&loaded.fueleu_reduction);
        tables.gfi_base_reduction =
            tables.gfi_base_reduction.with_values(&loaded.gfi_base_reduction);
        tables.gfi_direct_reduction =
            tables.gfi_direct_reduction.with_values(&loaded.gfi_direct_reduction);

        registry
    }

    pub fn validate(&self) -> Result<()> {
        self.fuels.validate()?;
        self.ships.validate()?;
        self.tables.validate()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::default_regulatory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_is_valid() {
        assert!(Registry::standard().validate().is_ok());
    }

    #[test]
    fn test_csv_registry_matches_defaults() {
        let loaded = Registry::from_csv().expect("Failed to load registry CSVs");
        let defaults = Registry::standard();

        for fuel in FuelType::ALL {
            assert_eq!(
                loaded.fuels.standard_for(fuel).unwrap(),
                defaults.fuels.standard_for(fuel).unwrap()
            );
        }
        for ship_type in ShipType::ALL {
            assert_eq!(
                loaded.ships.coefficients(ship_type).unwrap(),
                defaults.ships.coefficients(ship_type).unwrap()
            );
        }
        for year in 2020..=2052 {
            assert_eq!(
                loaded.tables.fueleu_reduction.lookup(year).unwrap(),
                defaults.tables.fueleu_reduction.lookup(year).unwrap()
            );
        }
    }
}

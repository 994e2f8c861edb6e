//! IMO CII ship categories and their reference-line coefficients

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ComplianceError, Result};

/// Ship categories rated under the CII regulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipType {
    BulkCarrier,
    GasCarrier,
    Tanker,
    ContainerShip,
    GeneralCargoShip,
    RefrigeratedCargoCarrier,
    CombinationCarrier,
    LngCarrier,
    RoRoCargoShipVehicleCarrier,
    RoRoCargoShip,
    RoRoPassengerShip,
    CruisePassengerShip,
}

impl ShipType {
    pub const ALL: [ShipType; 12] = [
        ShipType::BulkCarrier,
        ShipType::GasCarrier,
        ShipType::Tanker,
        ShipType::ContainerShip,
        ShipType::GeneralCargoShip,
        ShipType::RefrigeratedCargoCarrier,
        ShipType::CombinationCarrier,
        ShipType::LngCarrier,
        ShipType::RoRoCargoShipVehicleCarrier,
        ShipType::RoRoCargoShip,
        ShipType::RoRoPassengerShip,
        ShipType::CruisePassengerShip,
    ];

    /// Label used in IMO guidance tables
    pub fn label(&self) -> &'static str {
        match self {
            ShipType::BulkCarrier => "Bulk carrier",
            ShipType::GasCarrier => "Gas carrier",
            ShipType::Tanker => "Tanker",
            ShipType::ContainerShip => "Container ship",
            ShipType::GeneralCargoShip => "General cargo ship",
            ShipType::RefrigeratedCargoCarrier => "Refrigerated cargo carrier",
            ShipType::CombinationCarrier => "Combination carrier",
            ShipType::LngCarrier => "LNG carrier",
            ShipType::RoRoCargoShipVehicleCarrier => "Ro-ro cargo ship (vehicle carrier)",
            ShipType::RoRoCargoShip => "Ro-ro cargo ship",
            ShipType::RoRoPassengerShip => "Ro-ro passenger ship",
            ShipType::CruisePassengerShip => "Cruise passenger ship",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ShipType::BulkCarrier => "bulk_carrier",
            ShipType::GasCarrier => "gas_carrier",
            ShipType::Tanker => "tanker",
            ShipType::ContainerShip => "container_ship",
            ShipType::GeneralCargoShip => "general_cargo_ship",
            ShipType::RefrigeratedCargoCarrier => "refrigerated_cargo_carrier",
            ShipType::CombinationCarrier => "combination_carrier",
            ShipType::LngCarrier => "lng_carrier",
            ShipType::RoRoCargoShipVehicleCarrier => "ro_ro_cargo_ship_vehicle_carrier",
            ShipType::RoRoCargoShip => "ro_ro_cargo_ship",
            ShipType::RoRoPassengerShip => "ro_ro_passenger_ship",
            ShipType::CruisePassengerShip => "cruise_passenger_ship",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the snake_case key or the IMO label, case-insensitively
impl FromStr for ShipType {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        ShipType::ALL
            .iter()
            .copied()
            .find(|t| {
                t.key().eq_ignore_ascii_case(needle) || t.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ComplianceError::UnsupportedShipType(s.to_string()))
    }
}

/// Reference line (a, c) and rating boundary vectors (d1..d4)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CiiCoefficients {
    pub a: f64,
    pub c: f64,
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
}

impl CiiCoefficients {
    pub const fn new(a: f64, c: f64, d1: f64, d2: f64, d3: f64, d4: f64) -> Self {
        Self { a, c, d1, d2, d3, d4 }
    }

    /// Reference CII = a * DWT^(-c); zero capacity has no reference line
    pub fn reference_cii(&self, dwt: f64) -> f64 {
        if dwt > 0.0 {
            self.a * dwt.powf(-self.c)
        } else {
            0.0
        }
    }
}

/// CII coefficients for every ship category
#[derive(Debug, Clone)]
pub struct ShipRegistry {
    coefficients: HashMap<ShipType, CiiCoefficients>,
}

impl ShipRegistry {
    pub fn standard() -> Self {
        let coefficients = [
            (ShipType::BulkCarrier, CiiCoefficients::new(4745.0, 0.622, 0.86, 0.94, 1.06, 1.18)),
            (ShipType::GasCarrier, CiiCoefficients::new(14405.0, 0.71, 0.81, 0.91, 1.09, 1.19)),
            (ShipType::Tanker, CiiCoefficients::new(5247.0, 0.61, 0.82, 0.92, 1.08, 1.18)),
            (ShipType::ContainerShip, CiiCoefficients::new(1984.0, 0.489, 0.83, 0.93, 1.07, 1.17)),
            (
                ShipType::GeneralCargoShip,
                CiiCoefficients::new(3166.0, 0.439, 0.82, 0.92, 1.08, 1.18),
            ),
            (
                ShipType::RefrigeratedCargoCarrier,
                CiiCoefficients::new(227.0, 0.233, 0.78, 0.88, 1.12, 1.22),
            ),
            (
                ShipType::CombinationCarrier,
                CiiCoefficients::new(4085.0, 0.553, 0.87, 0.95, 1.05, 1.13),
            ),
            (ShipType::LngCarrier, CiiCoefficients::new(9842.0, 0.597, 0.78, 0.88, 1.12, 1.22)),
            (
                ShipType::RoRoCargoShipVehicleCarrier,
                CiiCoefficients::new(3627.0, 0.59, 0.77, 0.87, 1.13, 1.23),
            ),
            (ShipType::RoRoCargoShip, CiiCoefficients::new(1594.0, 0.445, 0.76, 0.86, 1.14, 1.24)),
            (
                ShipType::RoRoPassengerShip,
                CiiCoefficients::new(902.0, 0.381, 0.76, 0.86, 1.14, 1.24),
            ),
            (
                ShipType::CruisePassengerShip,
                CiiCoefficients::new(930.0, 0.383, 0.87, 0.95, 1.05, 1.13),
            ),
        ]
        .into_iter()
        .collect();

        Self { coefficients }
    }

    pub fn from_map(coefficients: HashMap<ShipType, CiiCoefficients>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self, ship_type: ShipType) -> Result<&CiiCoefficients> {
        self.coefficients
            .get(&ship_type)
            .ok_or_else(|| ComplianceError::UnsupportedShipType(ship_type.label().to_string()))
    }

    /// Boundaries must be strictly increasing for the rating to be monotone
    pub fn validate(&self) -> Result<()> {
        for (ship_type, k) in &self.coefficients {
            if !(k.a > 0.0 && k.d1 < k.d2 && k.d2 < k.d3 && k.d3 < k.d4) {
                return Err(ComplianceError::InvalidRegistry(format!(
                    "{} coefficients require a > 0 and d1 < d2 < d3 < d4",
                    ship_type
                )));
            }
        }
        Ok(())
    }
}

impl Default for ShipRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ship_type_by_key_and_label() {
        assert_eq!("bulk_carrier".parse::<ShipType>().unwrap(), ShipType::BulkCarrier);
        assert_eq!("LNG carrier".parse::<ShipType>().unwrap(), ShipType::LngCarrier);
        assert_eq!(
            "Ro-ro cargo ship (vehicle carrier)".parse::<ShipType>().unwrap(),
            ShipType::RoRoCargoShipVehicleCarrier
        );
        assert!(matches!(
            "Submarine".parse::<ShipType>(),
            Err(ComplianceError::UnsupportedShipType(_))
        ));
    }

    #[test]
    fn test_reference_line() {
        let registry = ShipRegistry::standard();
        let bulk = registry.coefficients(ShipType::BulkCarrier).unwrap();

        // 4745 * 62000^-0.622
        let reference = bulk.reference_cii(62_000.0);
        assert!((reference - 4745.0 * 62_000f64.powf(-0.622)).abs() < 1e-12);
        assert!(reference > 4.0 && reference < 5.0, "reference = {}", reference);

        assert_eq!(bulk.reference_cii(0.0), 0.0);
    }

    #[test]
    fn test_standard_registry_is_complete_and_valid() {
        let registry = ShipRegistry::standard();
        for ship_type in ShipType::ALL {
            assert!(registry.coefficients(ship_type).is_ok(), "missing {}", ship_type);
        }
        assert!(registry.validate().is_ok());
    }
}

//! Fuel categories and their per-regime emission coefficients
//!
//! Each regime prices fuel differently:
//! - carbon factors (tank-to-wake CO2 per gram) for CII and blending
//! - CO2/CH4/N2O components for EU ETS CO2-equivalents
//! - well-to-wake intensities per MJ for FuelEU Maritime
//! - well-to-wake factors per gram for IMO GFI
//!
//! VLSFO and LFO share one set of values in every regime.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ComplianceError, Result};

/// Global warming potential of methane (100-year)
pub const GWP_CH4: f64 = 28.0;

/// Global warming potential of nitrous oxide (100-year)
pub const GWP_N2O: f64 = 265.0;

/// Fossil marine fuel categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FuelType {
    /// Heavy fuel oil
    Hfo,
    /// Light fuel oil
    Lfo,
    /// Very low sulphur fuel oil
    Vlsfo,
    /// Marine gas oil
    Mgo,
    /// Liquefied natural gas
    Lng,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::Hfo,
        FuelType::Lfo,
        FuelType::Vlsfo,
        FuelType::Mgo,
        FuelType::Lng,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            FuelType::Hfo => "HFO",
            FuelType::Lfo => "LFO",
            FuelType::Vlsfo => "VLSFO",
            FuelType::Mgo => "MGO",
            FuelType::Lng => "LNG",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FuelType {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HFO" => Ok(FuelType::Hfo),
            "LFO" => Ok(FuelType::Lfo),
            "VLSFO" => Ok(FuelType::Vlsfo),
            "MGO" => Ok(FuelType::Mgo),
            "LNG" => Ok(FuelType::Lng),
            _ => Err(ComplianceError::UnsupportedFuel(s.to_string())),
        }
    }
}

/// Energy carriers accounted under FuelEU Maritime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnergyCarrier {
    Hfo,
    Lfo,
    Vlsfo,
    Mgo,
    Lng,
    /// Certified biofuel
    Bio,
    /// Renewable fuel of non-biological origin (e-methanol, e-ammonia)
    Rfnbo,
}

impl EnergyCarrier {
    /// The fossil fuel behind this carrier, if any
    pub fn fossil(&self) -> Option<FuelType> {
        match self {
            EnergyCarrier::Hfo => Some(FuelType::Hfo),
            EnergyCarrier::Lfo => Some(FuelType::Lfo),
            EnergyCarrier::Vlsfo => Some(FuelType::Vlsfo),
            EnergyCarrier::Mgo => Some(FuelType::Mgo),
            EnergyCarrier::Lng => Some(FuelType::Lng),
            EnergyCarrier::Bio | EnergyCarrier::Rfnbo => None,
        }
    }
}

impl From<FuelType> for EnergyCarrier {
    fn from(fuel: FuelType) -> Self {
        match fuel {
            FuelType::Hfo => EnergyCarrier::Hfo,
            FuelType::Lfo => EnergyCarrier::Lfo,
            FuelType::Vlsfo => EnergyCarrier::Vlsfo,
            FuelType::Mgo => EnergyCarrier::Mgo,
            FuelType::Lng => EnergyCarrier::Lng,
        }
    }
}

/// Lower calorific value and carbon factor of a fossil fuel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStandard {
    pub name: String,
    /// Lower calorific value (MJ/g)
    pub lcv: f64,
    /// Carbon factor (gCO2/g fuel)
    pub cf: f64,
}

impl FuelStandard {
    pub fn new(name: &str, lcv: f64, cf: f64) -> Self {
        Self {
            name: name.to_string(),
            lcv,
            cf,
        }
    }
}

/// Greenhouse gas components emitted per gram of fuel (EU ETS)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhgComponents {
    pub co2: f64,
    pub ch4: f64,
    pub n2o: f64,
}

impl GhgComponents {
    /// CO2-equivalent factor (gCO2e/g fuel)
    pub fn co2eq(&self) -> f64 {
        self.co2 + self.ch4 * GWP_CH4 + self.n2o * GWP_N2O
    }
}

/// Well-to-wake GHG intensity of an energy carrier (FuelEU)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WtwIntensity {
    /// Lower calorific value (MJ/g)
    pub lcv: f64,
    /// Well-to-tank intensity (gCO2eq/MJ)
    pub wtt: f64,
    /// Tank-to-wake intensity (gCO2eq/MJ)
    pub ttw: f64,
}

impl WtwIntensity {
    pub fn total(&self) -> f64 {
        self.wtt + self.ttw
    }
}

/// Well-to-wake emission factor per gram of fuel (IMO GFI)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GfiFactor {
    /// Lower calorific value (MJ/g)
    pub lcv: f64,
    /// Well-to-wake factor (gCO2eq/g fuel)
    pub wtw: f64,
}

/// Fuel coefficients for every regime
#[derive(Debug, Clone)]
pub struct FuelRegistry {
    standards: HashMap<FuelType, FuelStandard>,
    ets: HashMap<FuelType, GhgComponents>,
    fueleu: HashMap<EnergyCarrier, WtwIntensity>,
    gfi: HashMap<FuelType, GfiFactor>,
    gfi_biofuel: GfiFactor,
}

impl FuelRegistry {
    /// Regulatory default coefficients
    pub fn standard() -> Self {
        let mut standards = HashMap::new();
        standards.insert(FuelType::Hfo, FuelStandard::new("Heavy Fuel Oil", 0.0405, 3.114));
        standards.insert(FuelType::Lfo, FuelStandard::new("Light Fuel Oil", 0.0410, 3.151));
        standards.insert(
            FuelType::Vlsfo,
            FuelStandard::new("Very Low Sulphur Fuel Oil", 0.0410, 3.151),
        );
        standards.insert(FuelType::Mgo, FuelStandard::new("Marine Gas Oil", 0.0427, 3.206));
        standards.insert(FuelType::Lng, FuelStandard::new("Liquefied Natural Gas", 0.0480, 2.750));

        let oil = |co2: f64| GhgComponents { co2, ch4: 0.00005, n2o: 0.00018 };
        let mut ets = HashMap::new();
        ets.insert(FuelType::Hfo, oil(3.114));
        ets.insert(FuelType::Lfo, oil(3.151));
        ets.insert(FuelType::Vlsfo, oil(3.151));
        ets.insert(FuelType::Mgo, oil(3.206));
        ets.insert(FuelType::Lng, GhgComponents { co2: 2.750, ch4: 0.002, n2o: 0.00011 });

        let mut fueleu = HashMap::new();
        fueleu.insert(EnergyCarrier::Hfo, WtwIntensity { lcv: 0.0402, wtt: 13.5, ttw: 77.5 });
        fueleu.insert(EnergyCarrier::Lfo, WtwIntensity { lcv: 0.0410, wtt: 14.1, ttw: 78.3 });
        fueleu.insert(EnergyCarrier::Vlsfo, WtwIntensity { lcv: 0.0410, wtt: 14.1, ttw: 78.3 });
        fueleu.insert(EnergyCarrier::Mgo, WtwIntensity { lcv: 0.0427, wtt: 14.5, ttw: 79.0 });
        fueleu.insert(EnergyCarrier::Lng, WtwIntensity { lcv: 0.0480, wtt: 18.5, ttw: 68.0 });
        fueleu.insert(EnergyCarrier::Bio, WtwIntensity { lcv: 0.0370, wtt: 5.0, ttw: 0.0 });
        fueleu.insert(EnergyCarrier::Rfnbo, WtwIntensity { lcv: 0.0199, wtt: 0.0, ttw: 0.0 });

        let mut gfi = HashMap::new();
        gfi.insert(FuelType::Hfo, GfiFactor { lcv: 0.0405, wtw: 3.56 });
        gfi.insert(FuelType::Lfo, GfiFactor { lcv: 0.0410, wtw: 3.58 });
        gfi.insert(FuelType::Vlsfo, GfiFactor { lcv: 0.0410, wtw: 3.58 });
        gfi.insert(FuelType::Mgo, GfiFactor { lcv: 0.0427, wtw: 3.62 });
        gfi.insert(FuelType::Lng, GfiFactor { lcv: 0.0480, wtw: 3.05 });

        Self {
            standards,
            ets,
            fueleu,
            gfi,
            gfi_biofuel: GfiFactor { lcv: 0.0370, wtw: 0.55 },
        }
    }

    pub fn standard_for(&self, fuel: FuelType) -> Result<&FuelStandard> {
        self.standards
            .get(&fuel)
            .ok_or_else(|| ComplianceError::UnsupportedFuel(fuel.to_string()))
    }

    pub fn ets_components(&self, fuel: FuelType) -> Result<&GhgComponents> {
        self.ets
            .get(&fuel)
            .ok_or_else(|| ComplianceError::UnsupportedFuel(fuel.to_string()))
    }

    pub fn wtw_intensity(&self, carrier: EnergyCarrier) -> Result<&WtwIntensity> {
        self.fueleu
            .get(&carrier)
            .ok_or_else(|| ComplianceError::UnsupportedFuel(format!("{:?}", carrier)))
    }

    pub fn gfi_factor(&self, fuel: FuelType) -> Result<&GfiFactor> {
        self.gfi
            .get(&fuel)
            .ok_or_else(|| ComplianceError::UnsupportedFuel(fuel.to_string()))
    }

    pub fn gfi_biofuel(&self) -> &GfiFactor {
        &self.gfi_biofuel
    }

    /// Replace the carbon-factor standards (e.g. from a loaded CSV)
    pub fn set_standards(&mut self, standards: HashMap<FuelType, FuelStandard>) {
        self.standards = standards;
    }

    /// Check lcv > 0 and cf >= 0 for every loaded standard
    pub fn validate(&self) -> Result<()> {
        for (fuel, standard) in &self.standards {
            if !(standard.lcv > 0.0) || !(standard.cf >= 0.0) {
                return Err(ComplianceError::InvalidRegistry(format!(
                    "{} must have lcv > 0 and cf >= 0 (lcv={}, cf={})",
                    fuel, standard.lcv, standard.cf
                )));
            }
        }
        Ok(())
    }
}

impl Default for FuelRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_fuel_codes() {
        assert_eq!("hfo".parse::<FuelType>().unwrap(), FuelType::Hfo);
        assert_eq!(" VLSFO ".parse::<FuelType>().unwrap(), FuelType::Vlsfo);
        assert!(matches!(
            "Ammonia".parse::<FuelType>(),
            Err(ComplianceError::UnsupportedFuel(s)) if s == "Ammonia"
        ));
    }

    #[test]
    fn test_ets_co2eq_factors() {
        let registry = FuelRegistry::standard();

        let hfo = registry.ets_components(FuelType::Hfo).unwrap().co2eq();
        assert_abs_diff_eq!(hfo, 3.1631, epsilon = 1e-4);

        let mgo = registry.ets_components(FuelType::Mgo).unwrap().co2eq();
        assert_abs_diff_eq!(mgo, 3.2551, epsilon = 1e-4);
    }

    #[test]
    fn test_fueleu_intensity_totals() {
        let registry = FuelRegistry::standard();
        assert_eq!(registry.wtw_intensity(EnergyCarrier::Hfo).unwrap().total(), 91.0);
        assert_eq!(registry.wtw_intensity(EnergyCarrier::Bio).unwrap().total(), 5.0);
        assert_eq!(registry.wtw_intensity(EnergyCarrier::Rfnbo).unwrap().total(), 0.0);
    }

    #[test]
    fn test_missing_standard_is_unsupported() {
        let mut registry = FuelRegistry::standard();
        registry.set_standards(HashMap::new());
        assert!(matches!(
            registry.standard_for(FuelType::Lng),
            Err(ComplianceError::UnsupportedFuel(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_lcv() {
        let mut registry = FuelRegistry::standard();
        let mut standards = HashMap::new();
        standards.insert(FuelType::Hfo, FuelStandard::new("Broken", 0.0, 3.114));
        registry.set_standards(standards);
        assert!(registry.validate().is_err());
    }
}

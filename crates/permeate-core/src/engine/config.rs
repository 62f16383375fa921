use crate::core::models::domain::Domain;
use crate::core::models::ion::IonSpecies;
use crate::core::models::solutes::SoluteProfile;
use crate::core::transport::statistics::{self, Statistics};
use crate::engine::state::OperatingMode;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const PRESSURE_RANGE_PSI: RangeInclusive<f64> = 100.0..=1000.0;
pub const PORE_DIAMETER_RANGE_NM: RangeInclusive<f64> = 0.5..=5.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid concentration for {species}: {value} ppm (must be finite and non-negative)")]
    InvalidConcentration { species: IonSpecies, value: f64 },

    #[error("Invalid domain size {width} x {height}: both dimensions must be finite and positive")]
    InvalidDomain { width: f64, height: f64 },
}

/// A validated operating point for the membrane.
///
/// Instances only come out of [`FiltrationConfigBuilder::build`] (or `Default`), so every
/// consumer may assume pressure, pore diameter and concentrations are within range. To
/// change a value, go back through [`FiltrationConfig::to_builder`] and swap in the new
/// config as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct FiltrationConfig {
    pressure_psi: f64,
    pore_diameter_nm: f64,
    solutes: SoluteProfile,
}

impl FiltrationConfig {
    #[inline]
    pub fn pressure_psi(&self) -> f64 {
        self.pressure_psi
    }

    #[inline]
    pub fn pore_diameter_nm(&self) -> f64 {
        self.pore_diameter_nm
    }

    #[inline]
    pub fn solutes(&self) -> &SoluteProfile {
        &self.solutes
    }

    pub fn to_builder(&self) -> FiltrationConfigBuilder {
        FiltrationConfigBuilder::new()
            .pressure_psi(self.pressure_psi)
            .pore_diameter_nm(self.pore_diameter_nm)
            .solutes(self.solutes.clone())
    }

    /// Closed-form water-quality statistics for this operating point.
    pub fn statistics(&self, mode: OperatingMode) -> Statistics {
        statistics::compute(
            self.pressure_psi,
            self.pore_diameter_nm,
            &self.solutes,
            mode.is_running(),
        )
    }
}

impl Default for FiltrationConfig {
    fn default() -> Self {
        Self {
            pressure_psi: 500.0,
            pore_diameter_nm: 2.5,
            solutes: SoluteProfile::new()
                .with(IonSpecies::Sodium, 150.0)
                .with(IonSpecies::Potassium, 50.0)
                .with(IonSpecies::Magnesium, 80.0)
                .with(IonSpecies::Chloride, 200.0),
        }
    }
}

#[derive(Default)]
pub struct FiltrationConfigBuilder {
    pressure_psi: Option<f64>,
    pore_diameter_nm: Option<f64>,
    solutes: Option<SoluteProfile>,
}

impl FiltrationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pressure_psi(mut self, pressure: f64) -> Self {
        self.pressure_psi = Some(pressure);
        self
    }
    pub fn pore_diameter_nm(mut self, diameter: f64) -> Self {
        self.pore_diameter_nm = Some(diameter);
        self
    }
    pub fn solutes(mut self, solutes: SoluteProfile) -> Self {
        self.solutes = Some(solutes);
        self
    }
    pub fn solute(mut self, species: IonSpecies, ppm: f64) -> Self {
        self.solutes
            .get_or_insert_with(SoluteProfile::new)
            .set(species, ppm);
        self
    }

    pub fn build(self) -> Result<FiltrationConfig, ConfigError> {
        let pressure_psi = self
            .pressure_psi
            .ok_or(ConfigError::MissingParameter("pressure_psi"))?;
        let pore_diameter_nm = self
            .pore_diameter_nm
            .ok_or(ConfigError::MissingParameter("pore_diameter_nm"))?;
        let solutes = self
            .solutes
            .ok_or(ConfigError::MissingParameter("solutes"))?;

        check_range("pressure_psi", pressure_psi, &PRESSURE_RANGE_PSI)?;
        check_range("pore_diameter_nm", pore_diameter_nm, &PORE_DIAMETER_RANGE_NM)?;
        for (species, ppm) in solutes.iter() {
            if !ppm.is_finite() || ppm < 0.0 {
                return Err(ConfigError::InvalidConcentration {
                    species,
                    value: ppm,
                });
            }
            check_range(
                concentration_param(species),
                ppm,
                &(0.0..=species.max_concentration_ppm()),
            )?;
        }

        Ok(FiltrationConfig {
            pressure_psi,
            pore_diameter_nm,
            solutes,
        })
    }
}

fn concentration_param(species: IonSpecies) -> &'static str {
    match species {
        IonSpecies::Sodium => "solutes.Na",
        IonSpecies::Potassium => "solutes.K",
        IonSpecies::Magnesium => "solutes.Mg",
        IonSpecies::Chloride => "solutes.Cl",
    }
}

fn check_range(
    name: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), ConfigError> {
    // NaN fails `contains`, so non-finite values are rejected here too.
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

impl Domain {
    /// Validated constructor for the simulation domain.
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Domain::new_unchecked(width, height))
        } else {
            Err(ConfigError::InvalidDomain { width, height })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> FiltrationConfigBuilder {
        FiltrationConfigBuilder::new()
            .pressure_psi(500.0)
            .pore_diameter_nm(2.5)
            .solute(IonSpecies::Sodium, 150.0)
    }

    #[test]
    fn build_succeeds_with_all_parameters() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.pressure_psi(), 500.0);
        assert_eq!(config.pore_diameter_nm(), 2.5);
        assert_eq!(config.solutes().get(IonSpecies::Sodium), 150.0);
    }

    #[test]
    fn build_fails_when_parameter_missing() {
        let result = FiltrationConfigBuilder::new()
            .pore_diameter_nm(2.5)
            .solutes(SoluteProfile::new())
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("pressure_psi")));

        let result = FiltrationConfigBuilder::new()
            .pressure_psi(500.0)
            .pore_diameter_nm(2.5)
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("solutes")));
    }

    #[test]
    fn build_rejects_out_of_range_pressure_and_pore() {
        let err = complete_builder().pressure_psi(1200.0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "pressure_psi",
                ..
            }
        ));

        let err = complete_builder().pore_diameter_nm(0.0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "pore_diameter_nm",
                ..
            }
        ));

        assert!(complete_builder().pressure_psi(f64::NAN).build().is_err());
    }

    #[test]
    fn build_accepts_range_endpoints() {
        assert!(
            complete_builder()
                .pressure_psi(100.0)
                .pore_diameter_nm(5.0)
                .build()
                .is_ok()
        );
        assert!(
            complete_builder()
                .pressure_psi(1000.0)
                .pore_diameter_nm(0.5)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn build_rejects_negative_concentration() {
        let err = complete_builder()
            .solute(IonSpecies::Chloride, -1.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidConcentration {
                species: IonSpecies::Chloride,
                value: -1.0
            }
        );
    }

    #[test]
    fn build_rejects_concentration_above_species_cap() {
        let err = complete_builder()
            .solute(IonSpecies::Sodium, 1e15)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange {
                name: "solutes.Na",
                value: 1e15,
                min: 0.0,
                max: 500.0
            }
        );

        let err = complete_builder()
            .solute(IonSpecies::Potassium, 200.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "solutes.K",
                ..
            }
        ));
    }

    #[test]
    fn build_accepts_concentrations_at_species_cap() {
        let config = complete_builder()
            .solute(IonSpecies::Sodium, 500.0)
            .solute(IonSpecies::Potassium, 200.0)
            .solute(IonSpecies::Magnesium, 300.0)
            .solute(IonSpecies::Chloride, 800.0)
            .build()
            .unwrap();
        assert_eq!(config.solutes().total_ppm(), 1800.0);
    }

    #[test]
    fn default_matches_reference_operating_point() {
        let config = FiltrationConfig::default();
        assert_eq!(config.pressure_psi(), 500.0);
        assert_eq!(config.pore_diameter_nm(), 2.5);
        assert_eq!(config.solutes().total_ppm(), 480.0);
        assert_eq!(config.to_builder().build().unwrap(), config);
    }

    #[test]
    fn statistics_reflect_operating_mode() {
        let config = FiltrationConfig::default();
        assert_eq!(config.statistics(OperatingMode::Idle).energy, 0.0);
        assert_eq!(config.statistics(OperatingMode::Running).energy, 2.5);
    }

    #[test]
    fn domain_new_rejects_degenerate_sizes() {
        assert!(Domain::new(800.0, 500.0).is_ok());
        assert_eq!(
            Domain::new(0.0, 500.0),
            Err(ConfigError::InvalidDomain {
                width: 0.0,
                height: 500.0
            })
        );
        assert!(Domain::new(800.0, -1.0).is_err());
        assert!(Domain::new(f64::INFINITY, 10.0).is_err());
    }
}

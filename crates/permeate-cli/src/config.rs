mod defaults;

use crate::cli::{OperatingPointArgs, SimulateArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use defaults::DefaultsConfig;
use permeate::core::models::domain::Domain;
use permeate::core::models::solutes::SoluteProfile;
use permeate::engine::config::{FiltrationConfig, FiltrationConfigBuilder};
use permeate::workflows::simulate::SimulationOptions;
use serde::{Deserialize, Deserializer, de};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialMembraneConfig {
    pressure: Option<f64>,
    #[serde(rename = "pore-diameter")]
    pore_diameter: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDomainConfig {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSimulationConfig {
    ticks: Option<u64>,
    #[serde(rename = "frame-interval")]
    frame_interval: Option<u64>,
    seed: Option<u64>,
    running: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    membrane: Option<PartialMembraneConfig>,
    #[serde(default, deserialize_with = "deserialize_solutes")]
    solutes: Option<SoluteProfile>,
    domain: Option<PartialDomainConfig>,
    simulation: Option<PartialSimulationConfig>,
}

// Keys may be symbols or names in any case, so `na` and `Sodium` name the same entry.
fn deserialize_solutes<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<SoluteProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    let mut profile = SoluteProfile::new();
    for (key, ppm) in raw {
        let species = parser::parse_species(&key).map_err(de::Error::custom)?;
        if profile.contains(species) {
            return Err(de::Error::custom(format!(
                "species {} is listed more than once in [solutes] (last key: '{}')",
                species.symbol(),
                key
            )));
        }
        profile.set(species, ppm);
    }
    Ok(Some(profile))
}

/// Fully resolved settings for one invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub filtration: FiltrationConfig,
    pub domain: Domain,
    pub options: SimulationOptions,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `path` if given, otherwise starts from an empty partial config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No configuration file given, using built-in defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli(
        mut self,
        point: &OperatingPointArgs,
        simulate: Option<&SimulateArgs>,
    ) -> Result<AppConfig> {
        self.apply_set_values(&point.set_values)?;

        let defaults = DefaultsConfig::default();
        let membrane = self.membrane.take().unwrap_or_default();
        let domain_config = self.domain.take().unwrap_or_default();
        let sim_config = self.simulation.take().unwrap_or_default();

        let solutes = Self::merge_solutes(self.solutes.take(), &point.solutes, &defaults)?;

        let filtration = FiltrationConfigBuilder::new()
            .pressure_psi(
                point
                    .pressure
                    .or(membrane.pressure)
                    .unwrap_or(defaults.pressure),
            )
            .pore_diameter_nm(
                point
                    .pore_diameter
                    .or(membrane.pore_diameter)
                    .unwrap_or(defaults.pore_diameter),
            )
            .solutes(solutes)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let width = simulate
            .and_then(|s| s.width)
            .or(domain_config.width)
            .unwrap_or(defaults.width);
        let height = simulate
            .and_then(|s| s.height)
            .or(domain_config.height)
            .unwrap_or(defaults.height);
        let domain = Domain::new(width, height).map_err(|e| CliError::Config(e.to_string()))?;

        let running = !point.idle && sim_config.running.unwrap_or(defaults.running);
        let frame_interval = simulate
            .and_then(|s| s.frame_interval)
            .or(sim_config.frame_interval)
            .unwrap_or(defaults.frame_interval);
        if frame_interval == 0 {
            return Err(CliError::Config(
                "`simulation.frame-interval` must be at least 1.".to_string(),
            ));
        }

        let options = SimulationOptions {
            ticks: simulate
                .and_then(|s| s.ticks)
                .or(sim_config.ticks)
                .unwrap_or(defaults.ticks),
            frame_interval,
            seed: simulate.and_then(|s| s.seed).or(sim_config.seed),
            mode: running.into(),
        };

        Ok(AppConfig {
            filtration,
            domain,
            options,
        })
    }

    fn merge_solutes(
        file_solutes: Option<SoluteProfile>,
        cli_solutes: &[String],
        defaults: &DefaultsConfig,
    ) -> Result<SoluteProfile> {
        let mut profile = file_solutes.unwrap_or_else(|| defaults.solutes.clone());
        for entry in cli_solutes {
            let (species, ppm) =
                parser::parse_solute(entry).map_err(|e| CliError::Argument(e.to_string()))?;
            profile.set(species, ppm);
        }
        Ok(profile)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = parser::parse_assignment(kv_pair).map_err(|_| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let number_err = |e: parser::ParseError| CliError::Config(e.to_string());

            match key {
                "membrane.pressure" => {
                    self.membrane.get_or_insert_with(Default::default).pressure =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                "membrane.pore-diameter" => {
                    self.membrane
                        .get_or_insert_with(Default::default)
                        .pore_diameter =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                "domain.width" => {
                    self.domain.get_or_insert_with(Default::default).width =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                "domain.height" => {
                    self.domain.get_or_insert_with(Default::default).height =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                "simulation.ticks" => {
                    self.simulation.get_or_insert_with(Default::default).ticks =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                "simulation.frame-interval" => {
                    self.simulation
                        .get_or_insert_with(Default::default)
                        .frame_interval =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                "simulation.seed" => {
                    self.simulation.get_or_insert_with(Default::default).seed =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                "simulation.running" => {
                    self.simulation.get_or_insert_with(Default::default).running =
                        Some(parser::parse_number(key, value_str).map_err(number_err)?);
                }
                _ => match key.strip_prefix("solutes.") {
                    Some(symbol) => {
                        let species = parser::parse_species(symbol)
                            .map_err(|e| CliError::Config(e.to_string()))?;
                        let ppm = parser::parse_number(key, value_str).map_err(number_err)?;
                        self.solutes
                            .get_or_insert_with(|| DefaultsConfig::default().solutes)
                            .set(species, ppm);
                    }
                    None => {
                        return Err(CliError::Config(format!(
                            "Unsupported configuration key for --set: '{}'",
                            key
                        )));
                    }
                },
            }
        }
        Ok(())
    }
}

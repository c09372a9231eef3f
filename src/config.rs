use crate::params::SimulationParameters;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Model parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Infection rate (β).
    pub beta: f64,
    /// Recovery rate (γ).
    pub gamma: f64,
    /// Total population (N).
    pub population: u32,
}

/// Initial condition.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Initially infected individuals.
    pub infected: u32,
}

/// Output horizon.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of simulated days.
    pub days: u32,
}

/// Simulation configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub init: InitConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        SimulationParameters::default().into()
    }
}

impl From<SimulationParameters> for Config {
    fn from(params: SimulationParameters) -> Self {
        Self {
            model: ModelConfig {
                beta: params.beta,
                gamma: params.gamma,
                population: params.population,
            },
            init: InitConfig {
                infected: params.infected_init,
            },
            output: OutputConfig { days: params.days },
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Write the configuration to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let contents = toml::to_string(self).context("failed to serialize config")?;
        fs::write(file, contents).with_context(|| format!("failed to write {file:?}"))?;
        Ok(())
    }

    pub fn params(&self) -> SimulationParameters {
        SimulationParameters {
            beta: self.model.beta,
            gamma: self.model.gamma,
            infected_init: self.init.infected,
            population: self.model.population,
            days: self.output.days,
        }
    }

    fn validate(&self) -> Result<()> {
        check_num(self.model.beta, 0.0..).context("invalid infection rate")?;
        check_num(self.model.gamma, 0.0..).context("invalid recovery rate")?;
        check_num(self.model.population, 1..).context("invalid population")?;
        check_num(self.init.infected, 0..=self.model.population)
            .context("invalid initial number of infected")?;
        check_num(self.output.days, 1..).context("invalid number of days")?;

        let params = self.params();
        params.validate()?;

        for (control, val) in params.controls() {
            if !control.contains(val) {
                log::warn!(
                    "{} = {val} is outside the usual range [{}, {}]",
                    control.label,
                    control.min,
                    control.max
                );
            }
        }

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

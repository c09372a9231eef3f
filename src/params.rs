use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Input of a single simulation run.
///
/// `beta` and `gamma` are rates per day, `infected_init` and `population` are
/// head counts and `days` is the length of the simulated horizon.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Infection rate (β).
    pub beta: f64,
    /// Recovery rate (γ).
    pub gamma: f64,
    /// Initially infected individuals (I₀).
    pub infected_init: u32,
    /// Total population (N).
    pub population: u32,
    /// Number of simulated days.
    pub days: u32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            beta: BETA.default,
            gamma: GAMMA.default,
            infected_init: INFECTED_INIT.default as u32,
            population: POPULATION.default as u32,
            days: DAYS.default as u32,
        }
    }
}

impl SimulationParameters {
    /// Check that the parameters lie inside the domain of the model.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(SimError::invalid(
                "beta",
                format!("must be positive and finite, but is {}", self.beta),
            ));
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(SimError::invalid(
                "gamma",
                format!("must be positive and finite, but is {}", self.gamma),
            ));
        }
        if self.population == 0 {
            return Err(SimError::invalid("population", "must be positive"));
        }
        if self.infected_init > self.population {
            return Err(SimError::invalid(
                "infected_init",
                format!(
                    "must not exceed the population ({}), but is {}",
                    self.population, self.infected_init
                ),
            ));
        }
        if self.days == 0 {
            return Err(SimError::invalid("days", "must be positive"));
        }
        Ok(())
    }

    /// Values of the parameters paired with the control that sets them.
    pub fn controls(&self) -> [(&'static Control, f64); 5] {
        [
            (&BETA, self.beta),
            (&GAMMA, self.gamma),
            (&INFECTED_INIT, self.infected_init as f64),
            (&POPULATION, self.population as f64),
            (&DAYS, self.days as f64),
        ]
    }
}

/// Slider through which a parameter is adjusted.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Control {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Control {
    pub fn contains(&self, val: f64) -> bool {
        (self.min..=self.max).contains(&val)
    }
}

pub const BETA: Control = Control {
    name: "beta",
    label: "Infection rate (β)",
    min: 0.05,
    max: 0.5,
    step: 0.01,
    default: 0.3,
};

pub const GAMMA: Control = Control {
    name: "gamma",
    label: "Recovery rate (γ)",
    min: 0.05,
    max: 0.2,
    step: 0.01,
    default: 0.1,
};

pub const INFECTED_INIT: Control = Control {
    name: "infected_init",
    label: "Initial infected",
    min: 1.0,
    max: 50.0,
    step: 1.0,
    default: 10.0,
};

pub const POPULATION: Control = Control {
    name: "population",
    label: "Population (N)",
    min: 1000.0,
    max: 10000.0,
    step: 1.0,
    default: 5000.0,
};

pub const DAYS: Control = Control {
    name: "days",
    label: "Simulation days",
    min: 100.0,
    max: 500.0,
    step: 1.0,
    default: 200.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_controls() {
        let params = SimulationParameters::default();
        assert_eq!(
            params,
            SimulationParameters {
                beta: 0.3,
                gamma: 0.1,
                infected_init: 10,
                population: 5000,
                days: 200,
            }
        );
        assert!(params.validate().is_ok());
        for (control, val) in params.controls() {
            assert!(control.contains(val), "{} out of range", control.name);
        }
    }

    #[test]
    fn rejects_out_of_domain_values() {
        let base = SimulationParameters::default();

        let no_population = SimulationParameters {
            population: 0,
            infected_init: 0,
            ..base
        };
        let cases = [
            ("gamma", SimulationParameters { gamma: 0.0, ..base }),
            (
                "gamma",
                SimulationParameters {
                    gamma: f64::NAN,
                    ..base
                },
            ),
            ("beta", SimulationParameters { beta: -0.1, ..base }),
            ("population", no_population),
            (
                "infected_init",
                SimulationParameters {
                    infected_init: 5001,
                    ..base
                },
            ),
            ("days", SimulationParameters { days: 0, ..base }),
        ];

        for (exp_name, params) in cases {
            match params.validate() {
                Err(SimError::InvalidParameter { name, .. }) => assert_eq!(name, exp_name),
                other => panic!("expected invalid {exp_name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn everyone_infected_is_valid() {
        let params = SimulationParameters {
            infected_init: 5000,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }
}

use crate::error::SimError;
use crate::model::{CompartmentState, Point, SirSystem, StateVector, Trajectory};
use crate::params::SimulationParameters;
use ode_solvers::Dopri5;

/// Relative tolerance of the adaptive integrator.
pub const REL_TOL: f64 = 1e-8;
/// Absolute tolerance of the adaptive integrator.
pub const ABS_TOL: f64 = 1e-8;

/// Counters accumulated over all integration intervals of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationStats {
    pub num_eval: u32,
    pub accepted_steps: u32,
    pub rejected_steps: u32,
}

/// Simulation engine.
///
/// Holds validated parameters and integrates the SIR equations over the
/// unit time grid `0, 1, ..., days` with an adaptive Dormand–Prince method.
#[derive(Debug, Clone)]
pub struct Engine {
    params: SimulationParameters,
    rel_tol: f64,
    abs_tol: f64,
}

impl Engine {
    /// Create a new `Engine` after checking the parameters.
    pub fn new(params: SimulationParameters) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self {
            params,
            rel_tol: REL_TOL,
            abs_tol: ABS_TOL,
        })
    }

    /// Override the integrator tolerances.
    pub fn with_tolerances(mut self, rel_tol: f64, abs_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self.abs_tol = abs_tol;
        self
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn initial_condition(&self) -> CompartmentState {
        let n = self.params.population as f64;
        let i0 = self.params.infected_init as f64;
        CompartmentState::new(n - i0, i0, 0.0)
    }

    /// Integrate the model and return the full trajectory.
    ///
    /// The integrator is restarted on every grid interval and the state at
    /// the end of the interval becomes the next grid point.
    pub fn simulate(&self) -> Result<Trajectory, SimError> {
        let params = &self.params;
        let system = SirSystem::new(params.beta, params.gamma, params.population as f64);

        let n_points = params.days as usize + 1;
        let mut points = Vec::with_capacity(n_points);
        let mut stats = IntegrationStats::default();

        let mut y: StateVector = self.initial_condition().into();
        points.push(Point {
            t: 0.0,
            state: y.into(),
        });

        for day in 0..params.days {
            let t_start = day as f64;
            let t_end = t_start + 1.0;

            let mut stepper =
                Dopri5::new(system, t_start, t_end, 1.0, y, self.rel_tol, self.abs_tol);
            let step_stats = stepper.integrate()?;
            stats.num_eval += step_stats.num_eval;
            stats.accepted_steps += step_stats.accepted_steps;
            stats.rejected_steps += step_stats.rejected_steps;

            // Dense output lands on both interval ends; the last one is `t_end`.
            match (stepper.x_out().last(), stepper.y_out().last()) {
                (Some(&t), Some(&y_end)) if t == t_end => y = y_end,
                (t, _) => {
                    return Err(SimError::Incomplete {
                        t_reached: t.copied().unwrap_or(t_start),
                        t_end,
                    });
                }
            }

            points.push(Point {
                t: t_end,
                state: y.into(),
            });
        }

        log::debug!("integrated {} days: {stats:?}", params.days);

        Ok(Trajectory::new(points))
    }
}

/// Simulate the SIR model for the given parameters.
///
/// # Errors
/// Returns [`SimError::InvalidParameter`] if the parameters are outside the
/// model domain and [`SimError::Integration`] if the integrator fails.
pub fn simulate(params: &SimulationParameters) -> Result<Trajectory, SimError> {
    Engine::new(*params)?.simulate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_trajectory() -> Trajectory {
        simulate(&SimulationParameters::default()).unwrap()
    }

    #[test]
    fn trajectory_covers_every_day() {
        for days in [1, 7, 100, 200, 500] {
            let params = SimulationParameters {
                days,
                ..Default::default()
            };
            let traj = simulate(&params).unwrap();

            assert_eq!(traj.len(), days as usize + 1);
            for (idx, t) in traj.times().enumerate() {
                assert_eq!(t, idx as f64);
            }
        }
    }

    #[test]
    fn starts_from_initial_condition() {
        let traj = default_trajectory();
        let first = traj.points()[0].state;
        assert_eq!(first, CompartmentState::new(4990.0, 10.0, 0.0));
    }

    #[test]
    fn population_is_conserved() {
        let params = SimulationParameters {
            beta: 0.5,
            gamma: 0.05,
            infected_init: 1,
            population: 10_000,
            days: 500,
        };
        let traj = simulate(&params).unwrap();

        let n = params.population as f64;
        for pnt in traj.points() {
            assert!(
                (pnt.state.total() - n).abs() < 1e-3 * n,
                "population drifted at t = {}: {}",
                pnt.t,
                pnt.state.total()
            );
        }
    }

    #[test]
    fn recovered_never_decreases() {
        let traj = default_trajectory();
        let recovered: Vec<f64> = traj.recovered().collect();
        for pair in recovered.windows(2) {
            assert!(pair[1] >= pair[0], "{} < {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn infection_rises_then_falls() {
        let traj = default_trajectory();
        let infected: Vec<f64> = traj.infected().collect();

        let mut peak_day = 0;
        for (day, &val) in infected.iter().enumerate() {
            if val > infected[peak_day] {
                peak_day = day;
            }
        }
        let peak = infected[peak_day];

        assert!(peak_day > 0 && peak_day < 200);
        assert!(peak > infected[0]);
        assert!(infected[200] < peak);
    }

    #[test]
    fn everyone_infected_decays_exponentially() {
        let params = SimulationParameters {
            beta: 0.3,
            gamma: 0.1,
            infected_init: 5000,
            population: 5000,
            days: 100,
        };
        let traj = simulate(&params).unwrap();

        for pnt in traj.points() {
            let exp_i = 5000.0 * (-0.1 * pnt.t).exp();
            assert_eq!(pnt.state.s, 0.0);
            assert_relative_eq!(pnt.state.i, exp_i, max_relative = 1e-6);
            assert_relative_eq!(pnt.state.r, 5000.0 - pnt.state.i, epsilon = 1e-6);
        }
    }

    #[test]
    fn no_infected_stays_put() {
        let params = SimulationParameters {
            infected_init: 0,
            ..Default::default()
        };
        let traj = simulate(&params).unwrap();

        for pnt in traj.points() {
            assert_eq!(pnt.state, CompartmentState::new(5000.0, 0.0, 0.0));
        }
    }

    #[test]
    fn invalid_parameters_never_reach_integrator() {
        let params = SimulationParameters {
            population: 0,
            infected_init: 0,
            ..Default::default()
        };
        let err = simulate(&params).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "population", .. }));

        let params = SimulationParameters {
            gamma: 0.0,
            ..Default::default()
        };
        let err = simulate(&params).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "gamma", .. }));
    }

    #[test]
    fn stiff_system_reports_integration_error() {
        let params = SimulationParameters {
            beta: 1e6,
            gamma: 0.1,
            days: 10,
            ..Default::default()
        };
        let err = simulate(&params).unwrap_err();
        assert!(matches!(err, SimError::Integration(_)), "{err:?}");
    }

    #[test]
    fn tighter_tolerances_agree() {
        let params = SimulationParameters::default();
        let coarse = Engine::new(params)
            .unwrap()
            .with_tolerances(1e-6, 1e-6)
            .simulate()
            .unwrap();
        let fine = default_trajectory();

        for (a, b) in coarse.infected().zip(fine.infected()) {
            assert_relative_eq!(a, b, epsilon = 1e-3, max_relative = 1e-3);
        }
    }
}

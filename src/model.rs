use ode_solvers::{SVector, System};
use serde::{Deserialize, Serialize};

pub type StateVector = SVector<f64, 3>;

/// Compartment sizes at a point in time.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct CompartmentState {
    /// Susceptible individuals.
    pub s: f64,
    /// Infected individuals.
    pub i: f64,
    /// Recovered individuals.
    pub r: f64,
}

impl CompartmentState {
    pub fn new(s: f64, i: f64, r: f64) -> Self {
        Self { s, i, r }
    }

    /// Total population across the three compartments.
    pub fn total(&self) -> f64 {
        self.s + self.i + self.r
    }
}

impl From<StateVector> for CompartmentState {
    fn from(y: StateVector) -> Self {
        Self::new(y[0], y[1], y[2])
    }
}

impl From<CompartmentState> for StateVector {
    fn from(state: CompartmentState) -> Self {
        StateVector::new(state.s, state.i, state.r)
    }
}

/// Mass-action SIR rate equations.
///
/// Infection moves `β·S·I/N` per day from S to I and recovery moves `γ·I`
/// per day from I to R, so the total population is conserved.
#[derive(Debug, Clone, Copy)]
pub struct SirSystem {
    beta: f64,
    gamma: f64,
    population: f64,
}

impl SirSystem {
    pub fn new(beta: f64, gamma: f64, population: f64) -> Self {
        Self {
            beta,
            gamma,
            population,
        }
    }

    pub fn derivative(&self, state: &CompartmentState) -> CompartmentState {
        let infection = self.beta * state.s * state.i / self.population;
        let recovery = self.gamma * state.i;
        CompartmentState::new(-infection, infection - recovery, recovery)
    }
}

impl System<f64, StateVector> for SirSystem {
    fn system(&self, _t: f64, y: &StateVector, dy: &mut StateVector) {
        *dy = self.derivative(&(*y).into()).into();
    }
}

/// Time point of a [`Trajectory`].
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub t: f64,
    pub state: CompartmentState,
}

/// Compartment sizes on the unit time grid `0, 1, ..., days`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<Point>,
}

impl Trajectory {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|pnt| pnt.t)
    }

    pub fn susceptible(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|pnt| pnt.state.s)
    }

    pub fn infected(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|pnt| pnt.state.i)
    }

    pub fn recovered(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|pnt| pnt.state.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn derivative_conserves_population() {
        let system = SirSystem::new(0.3, 0.1, 5000.0);
        let state = CompartmentState::new(4990.0, 10.0, 0.0);

        let dy = system.derivative(&state);

        assert_relative_eq!(dy.s, -0.3 * 4990.0 * 10.0 / 5000.0);
        assert_relative_eq!(dy.i, 0.3 * 4990.0 * 10.0 / 5000.0 - 1.0);
        assert_relative_eq!(dy.r, 1.0);
        assert_relative_eq!(dy.total(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn no_infection_without_susceptibles() {
        let system = SirSystem::new(0.3, 0.1, 100.0);
        let mut dy = StateVector::zeros();

        system.system(0.0, &StateVector::new(0.0, 100.0, 0.0), &mut dy);

        assert_eq!(dy[0], 0.0);
        assert_relative_eq!(dy[1], -10.0);
        assert_relative_eq!(dy[2], 10.0);
    }
}

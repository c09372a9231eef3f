use crate::error::SimError;
use crate::model::Trajectory;
use crate::params::SimulationParameters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an outbreak judged from its basic reproduction number.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Outbreak {
    Controlled,
    Explosive,
    High,
}

impl Outbreak {
    pub fn label(&self) -> &'static str {
        match self {
            Outbreak::Controlled => "Controlled",
            Outbreak::Explosive => "Explosive",
            Outbreak::High => "High",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Outbreak::Controlled => "✅",
            Outbreak::Explosive => "⚡",
            Outbreak::High => "⚠️",
        }
    }
}

impl fmt::Display for Outbreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

/// Statistics derived from a single run.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Basic reproduction number, β/γ.
    pub r0: f64,
    pub outbreak: Outbreak,
    /// Day on which the infected compartment peaks.
    pub peak_day: usize,
    /// Infected count at the peak, truncated.
    pub peak_infected: u64,
}

/// Compute the basic reproduction number `beta / gamma`.
pub fn compute_r0(beta: f64, gamma: f64) -> Result<f64, SimError> {
    if gamma == 0.0 || !gamma.is_finite() {
        return Err(SimError::invalid(
            "gamma",
            format!("must be non-zero and finite, but is {gamma}"),
        ));
    }
    Ok(beta / gamma)
}

/// Classify an outbreak by its reproduction number.
///
/// The high threshold is checked first; only then the controlled one. Both
/// boundaries, 1.2 and 1.5, fall into [`Outbreak::Explosive`].
pub fn classify_outbreak(r0: f64) -> Outbreak {
    if r0 > 1.5 {
        Outbreak::High
    } else if r0 < 1.2 {
        Outbreak::Controlled
    } else {
        Outbreak::Explosive
    }
}

/// Locate the infection peak of a trajectory.
///
/// Returns the index of the first maximum of the infected compartment and
/// that maximum truncated to an integer. An empty trajectory yields `(0, 0)`.
pub fn find_peak(traj: &Trajectory) -> (usize, u64) {
    let mut peak_day = 0;
    let mut peak = f64::NEG_INFINITY;
    for (day, val) in traj.infected().enumerate() {
        if val > peak {
            peak_day = day;
            peak = val;
        }
    }
    if peak.is_finite() {
        (peak_day, peak.max(0.0) as u64)
    } else {
        (0, 0)
    }
}

/// Summarize a run from its parameters and trajectory.
pub fn summarize(
    params: &SimulationParameters,
    traj: &Trajectory,
) -> Result<SummaryStatistics, SimError> {
    let r0 = compute_r0(params.beta, params.gamma)?;
    let (peak_day, peak_infected) = find_peak(traj);
    Ok(SummaryStatistics {
        r0,
        outbreak: classify_outbreak(r0),
        peak_day,
        peak_infected,
    })
}

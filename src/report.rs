use crate::engine::simulate;
use crate::error::SimError;
use crate::model::Trajectory;
use crate::params::SimulationParameters;
use crate::stats::{SummaryStatistics, summarize};
use serde::{Deserialize, Serialize};

/// One curve of a [`Figure`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub line_width: f64,
    /// `(t, value)` pairs.
    pub points: Vec<(f64, f64)>,
}

/// Description of the compartment plot, independent of any plotting backend.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Width and height in inches.
    pub size: (f64, f64),
    pub legend_font_size: f64,
    /// Opacity of the grid lines.
    pub grid_alpha: f64,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(r0: f64, traj: &Trajectory) -> Self {
        let series = |label: &str, color: &str, vals: Vec<f64>| Series {
            label: label.to_string(),
            color: color.to_string(),
            line_width: 3.0,
            points: traj.times().zip(vals).collect(),
        };

        Self {
            title: figure_title(r0),
            x_label: "Days".to_string(),
            y_label: "Population".to_string(),
            size: (10.0, 6.0),
            legend_font_size: 12.0,
            grid_alpha: 0.3,
            series: vec![
                series("Susceptible", "blue", traj.susceptible().collect()),
                series("Infected", "red", traj.infected().collect()),
                series("Recovered", "green", traj.recovered().collect()),
            ],
        }
    }
}

/// The three outputs of a run: R₀ line, compartment figure and narrative.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: SummaryStatistics,
    pub r0_display: String,
    pub figure: Figure,
    pub explanation: String,
}

impl Dashboard {
    /// Simulate once and build every output from the same trajectory.
    pub fn render(params: &SimulationParameters) -> Result<Self, SimError> {
        let traj = simulate(params)?;
        Self::from_trajectory(params, &traj)
    }

    pub fn from_trajectory(
        params: &SimulationParameters,
        traj: &Trajectory,
    ) -> Result<Self, SimError> {
        let summary = summarize(params, traj)?;
        Ok(Self {
            r0_display: r0_display(&summary),
            figure: Figure::new(summary.r0, traj),
            explanation: explanation(&summary, params),
            summary,
        })
    }
}

/// Format R₀ with its outbreak class, e.g. `R₀ = 3.00 ⚠️ High`.
pub fn r0_display(summary: &SummaryStatistics) -> String {
    format!("R₀ = {:.2} {}", summary.r0, summary.outbreak)
}

pub fn figure_title(r0: f64) -> String {
    format!("SIR Model (R₀ = {r0:.2})")
}

pub fn explanation(summary: &SummaryStatistics, params: &SimulationParameters) -> String {
    format!(
        "🔍 Peak infection: Day {}, {} cases. Total pop: {}, initial cases: {}.",
        summary.peak_day,
        group_thousands(summary.peak_infected),
        group_thousands(params.population as u64),
        params.infected_init,
    )
}

/// Format an integer with commas between groups of three digits.
pub fn group_thousands(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

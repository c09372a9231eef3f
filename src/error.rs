use ode_solvers::dop_shared::IntegrationError;
use thiserror::Error;

/// Error returned by the simulation core.
#[derive(Debug, Error)]
pub enum SimError {
    /// A parameter lies outside the domain of the model.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The ODE integrator gave up before reaching the end of the horizon.
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    /// The integrator returned without producing the state at the end of an
    /// interval.
    #[error("integration stopped at t = {t_reached} before reaching t = {t_end}")]
    Incomplete { t_reached: f64, t_end: f64 },
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

//! Deterministic simulation of the SIR epidemic model.
//!
//! [`report::Dashboard::render`] runs the whole pipeline for one parameter
//! set: simulate, summarize and format the outputs shown to the user.

pub mod config;
pub mod engine;
pub mod error;
pub mod manager;
pub mod model;
pub mod params;
pub mod report;
pub mod stats;

pub use engine::simulate;
pub use error::SimError;
pub use params::SimulationParameters;
pub use stats::{classify_outbreak, compute_r0, summarize};

//! Decision-support calculator for field epidemiology training programme
//! scale-up: stakeholder endorsement, economic cost, outbreak-response
//! benefit and the value-for-money summary of a programme design.

pub mod appraisal;
pub mod config;
pub mod error;
pub mod telemetry;

pub use appraisal::{
    evaluate, AppraisalEngine, AppraisalResults, AppraisalSession, ParameterSet, ScenarioConfig,
};
pub use error::AppError;

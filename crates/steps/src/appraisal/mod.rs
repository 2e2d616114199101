//! Programme appraisal: endorsement, costing, outbreak benefit and the
//! summary figures derived from one scenario configuration.

pub mod aggregate;
pub mod benefit;
pub mod costing;
pub mod domain;
mod engine;
pub mod parameters;
pub mod preference;
pub mod report;
pub mod scenarios;
mod session;

#[cfg(test)]
mod tests;

pub use aggregate::{Aggregate, Recommendation, RecommendationThresholds};
pub use benefit::EpiBenefit;
pub use costing::{ComponentCost, CostBreakdown};
pub use domain::{
    Attribute, CareerIncentive, DeliveryMode, MentorshipIntensity, PreferenceModelId,
    ProgrammeTier, ResponseTime, ScenarioConfig,
};
pub use engine::{evaluate, AppraisalEngine, AppraisalResults};
pub use parameters::{
    AdvancedOverrides, CostTemplate, CostTemplateSet, EpiParameters, ParameterSet,
    TierOverride, TierParameters,
};
pub use preference::{willingness_to_pay, Endorsement, ModelCatalog, PreferenceModel, WtpEntry};
pub use session::AppraisalSession;

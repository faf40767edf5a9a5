//! Feature engineering, weighted scoring, explanations, legacy comparison and
//! disparity auditing for tenant applications.

pub mod audit;
pub mod batch;
pub mod domain;
pub mod error;
pub mod explain;
pub mod features;
pub mod impact;
pub mod legacy;
pub mod policy;
pub mod router;
pub mod scoring;
pub mod service;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use audit::{run_audit, AuditConfig, AuditReport, GroupAudit, LabeledApplicant, ModelAudit};
pub use batch::{parse_audit_batch, write_audit_batch};
pub use domain::{
    ApplicantRecord, ExplanationEntry, FeatureName, FeatureStatus, FeatureVector, ImpactEstimate,
    RiskLevel, ScoreResult,
};
pub use error::ScreeningError;
pub use explain::explain_features;
pub use features::compute_features;
pub use impact::calculate_impact;
pub use legacy::{adapt_to_legacy, LegacyFeatures, LegacyModel, LegacyScore, TrainingSummary};
pub use router::{screening_router, AuditRequest};
pub use scoring::{risk_level_for, FairScorer, ScoringModel};
pub use service::{
    ComparisonReport, LegacySource, ModelBundle, ScoreResponse, ScreeningService,
};
pub use synthetic::{generate_population, SyntheticApplicant};

//! Adverse-impact audit across a protected attribute.
//!
//! Every model scores the same batch; applicants at or above the threshold
//! count as approved. Each group's approval rate is compared against a
//! reference group, by default the most-favored one, and ratios under
//! four-fifths are flagged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::ApplicantRecord;
use super::error::ScreeningError;
use super::policy::ADVERSE_IMPACT_RATIO;
use super::scoring::ScoringModel;

/// Applicant tagged with the protected-group label used only for auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledApplicant {
    pub group: String,
    #[serde(flatten)]
    pub record: ApplicantRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub threshold: f64,
    #[serde(default)]
    pub reference_group: Option<String>,
}

/// Aggregates for one group under one model. Rates are `None` when the group
/// has no applicants or the reference rate is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAudit {
    pub group: String,
    pub applicants: usize,
    pub approved: usize,
    pub approval_rate: Option<f64>,
    pub mean_score: Option<f64>,
    pub disparity_ratio: Option<f64>,
    pub mean_score_gap: Option<f64>,
    pub membership_correlation: Option<f64>,
    pub adverse_impact: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAudit {
    pub model: String,
    pub reference_group: Option<String>,
    pub groups: Vec<GroupAudit>,
}

impl ModelAudit {
    pub fn group(&self, label: &str) -> Option<&GroupAudit> {
        self.groups.iter().find(|group| group.group == label)
    }

    pub fn adverse_impact_groups(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|group| group.adverse_impact)
            .map(|group| group.group.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub threshold: f64,
    pub applicants: usize,
    pub models: Vec<ModelAudit>,
}

impl AuditReport {
    pub fn model(&self, name: &str) -> Option<&ModelAudit> {
        self.models.iter().find(|model| model.model == name)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    applicants: usize,
    approved: usize,
    score_sum: f64,
}

impl Tally {
    fn approval_rate(&self) -> Option<f64> {
        (self.applicants > 0).then(|| self.approved as f64 / self.applicants as f64)
    }

    fn mean_score(&self) -> Option<f64> {
        (self.applicants > 0).then(|| self.score_sum / self.applicants as f64)
    }
}

pub fn run_audit(
    batch: &[LabeledApplicant],
    models: &[&dyn ScoringModel],
    config: &AuditConfig,
) -> Result<AuditReport, ScreeningError> {
    if !(0.0..=100.0).contains(&config.threshold) {
        return Err(ScreeningError::InvalidInput {
            field: "threshold",
            reason: "must be between 0 and 100",
        });
    }
    for applicant in batch {
        applicant.record.validate()?;
    }

    let models = models
        .iter()
        .map(|model| audit_model(batch, *model, config))
        .collect();

    Ok(AuditReport {
        generated_at: Utc::now(),
        threshold: config.threshold,
        applicants: batch.len(),
        models,
    })
}

fn audit_model(
    batch: &[LabeledApplicant],
    model: &dyn ScoringModel,
    config: &AuditConfig,
) -> ModelAudit {
    let scored: Vec<(&str, f64)> = batch
        .iter()
        .map(|applicant| (applicant.group.as_str(), model.score_record(&applicant.record)))
        .collect();

    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    if let Some(reference) = config.reference_group.as_deref() {
        tallies.entry(reference).or_default();
    }
    for (group, score) in &scored {
        let tally = tallies.entry(*group).or_default();
        tally.applicants += 1;
        tally.score_sum += score;
        if *score >= config.threshold {
            tally.approved += 1;
        }
    }

    let reference = config
        .reference_group
        .as_deref()
        .or_else(|| most_favored(&tallies));
    let reference_tally = reference.and_then(|label| tallies.get(label)).copied();
    let reference_rate = reference_tally.and_then(|tally| tally.approval_rate());
    let reference_mean = reference_tally.and_then(|tally| tally.mean_score());

    let groups = tallies
        .iter()
        .map(|(label, tally)| {
            let approval_rate = tally.approval_rate();
            let mean_score = tally.mean_score();
            let disparity_ratio = match (approval_rate, reference_rate) {
                (Some(rate), Some(reference_rate)) if reference_rate > 0.0 => {
                    Some(rate / reference_rate)
                }
                _ => None,
            };
            let mean_score_gap = match (mean_score, reference_mean) {
                (Some(mean), Some(reference_mean)) => Some(mean - reference_mean),
                _ => None,
            };

            GroupAudit {
                group: label.to_string(),
                applicants: tally.applicants,
                approved: tally.approved,
                approval_rate,
                mean_score,
                disparity_ratio,
                mean_score_gap,
                membership_correlation: membership_correlation(&scored, label),
                adverse_impact: disparity_ratio
                    .map(|ratio| ratio < ADVERSE_IMPACT_RATIO)
                    .unwrap_or(false),
            }
        })
        .collect();

    ModelAudit {
        model: model.name().to_string(),
        reference_group: reference.map(str::to_string),
        groups,
    }
}

/// Highest approval rate wins; ties keep the alphabetically first label.
fn most_favored<'a>(tallies: &BTreeMap<&'a str, Tally>) -> Option<&'a str> {
    let mut best: Option<(&'a str, f64)> = None;
    for (label, tally) in tallies {
        if let Some(rate) = tally.approval_rate() {
            if best.map_or(true, |(_, best_rate)| rate > best_rate) {
                best = Some((*label, rate));
            }
        }
    }
    best.map(|(label, _)| label)
}

/// Pearson correlation between score and a 0/1 membership indicator.
fn membership_correlation(scored: &[(&str, f64)], label: &str) -> Option<f64> {
    if scored.len() < 2 {
        return None;
    }

    let n = scored.len() as f64;
    let indicator = |group: &str| if group == label { 1.0 } else { 0.0 };
    let mean_x = scored.iter().map(|(group, _)| indicator(*group)).sum::<f64>() / n;
    let mean_y = scored.iter().map(|(_, score)| score).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (group, score) in scored {
        let dx = indicator(*group) - mean_x;
        let dy = score - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = (variance_x * variance_y).sqrt();
    (denominator > 0.0).then(|| covariance / denominator)
}

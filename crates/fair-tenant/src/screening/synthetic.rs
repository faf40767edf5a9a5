//! Seeded synthetic applicant population with group-level disparities baked in.
//!
//! The population feeds demos and audits, and doubles as a training table for
//! the legacy model when no CSV is configured. Credit scores, voucher use and
//! income are drawn from group-dependent distributions so a credit-centric
//! model reproduces the disparity the audit is meant to surface.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::audit::LabeledApplicant;
use super::domain::ApplicantRecord;
use super::legacy::{LegacyFeatures, TrainingRow};

pub const DEFAULT_SEED: u64 = 42;

const HISTORY_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy)]
struct GroupProfile {
    label: &'static str,
    share: f64,
    voucher_rate: f64,
    credit_mean: f64,
    credit_sd: f64,
    stability_penalty: f64,
    base_income: f64,
}

const GROUPS: [GroupProfile; 3] = [
    GroupProfile {
        label: "White",
        share: 0.5,
        voucher_rate: 0.2,
        credit_mean: 725.0,
        credit_sd: 50.0,
        stability_penalty: 0.0,
        base_income: 6400.0,
    },
    GroupProfile {
        label: "Black",
        share: 0.3,
        voucher_rate: 0.5,
        credit_mean: 612.0,
        credit_sd: 60.0,
        stability_penalty: 10.0,
        base_income: 4200.0,
    },
    GroupProfile {
        label: "Hispanic",
        share: 0.2,
        voucher_rate: 0.4,
        credit_mean: 661.0,
        credit_sd: 55.0,
        stability_penalty: 5.0,
        base_income: 4800.0,
    },
];

/// One generated applicant in both the legacy and the new intake schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticApplicant {
    pub group: String,
    pub legacy: LegacyFeatures,
    pub approved: f64,
    pub record: ApplicantRecord,
}

impl SyntheticApplicant {
    pub fn training_row(&self) -> TrainingRow {
        TrainingRow::from_features(&self.legacy, self.approved)
    }

    pub fn labeled(&self) -> LabeledApplicant {
        LabeledApplicant {
            group: self.group.clone(),
            record: self.record.clone(),
        }
    }
}

struct Draw {
    profile: GroupProfile,
    legacy: LegacyFeatures,
    monthly_income: f64,
}

pub fn generate_population(count: usize, seed: u64) -> Vec<SyntheticApplicant> {
    let mut rng = StdRng::seed_from_u64(seed);
    let draws: Vec<Draw> = (0..count).map(|_| draw_applicant(&mut rng)).collect();

    // Income enters the approval target as a standardized log, so it needs the
    // whole population first.
    let log_incomes: Vec<f64> = draws
        .iter()
        .map(|draw| (draw.monthly_income + 1.0).ln())
        .collect();
    let n = log_incomes.len().max(1) as f64;
    let log_mean = log_incomes.iter().sum::<f64>() / n;
    let log_std = (log_incomes
        .iter()
        .map(|value| (value - log_mean).powi(2))
        .sum::<f64>()
        / n)
        .sqrt();

    draws
        .into_iter()
        .zip(log_incomes)
        .map(|(draw, log_income)| {
            let income_component = if log_std > 0.0 {
                (log_income - log_mean) / log_std
            } else {
                0.0
            };
            let approved = approval_target(&draw.legacy, income_component);
            let record = intake_record(&mut rng, &draw);

            SyntheticApplicant {
                group: draw.profile.label.to_string(),
                legacy: draw.legacy,
                approved,
                record,
            }
        })
        .collect()
}

fn draw_applicant(rng: &mut StdRng) -> Draw {
    let profile = pick_group(rng);
    let voucher = u8::from(rng.gen::<f64>() < profile.voucher_rate);
    let voucher_f = f64::from(voucher);

    let credit_score = normal(rng, profile.credit_mean, profile.credit_sd).clamp(300.0, 850.0);
    let eviction_history = u8::from(rng.gen::<f64>() < 0.1 + 0.2 * voucher_f);
    let income_stability = normal(
        rng,
        80.0 - 15.0 * voucher_f - profile.stability_penalty,
        10.0,
    )
    .clamp(0.0, 100.0);
    let criminal_history = u8::from(rng.gen::<f64>() < 0.1);
    let employment_years =
        normal(rng, 5.0 + 2.0 * f64::from(1 - voucher), 2.0).clamp(0.0, 40.0);
    let savings_ratio = normal(rng, 0.1 + 0.05 * (income_stability / 100.0), 0.05).clamp(0.0, 1.0);
    let rental_history_years =
        normal(rng, 3.0 + 0.5 * income_stability / 100.0, 2.0).clamp(0.0, 20.0);

    let monthly_income = (profile.base_income
        * (income_stability / 100.0)
        * (1.0 - 0.25 * voucher_f)
        + normal(rng, 0.0, 600.0))
    .clamp(800.0, 20_000.0);

    Draw {
        profile,
        legacy: LegacyFeatures {
            credit_score,
            income_stability,
            eviction_history,
            criminal_history,
            voucher,
            employment_years,
            savings_ratio,
            rental_history_years,
        },
        monthly_income,
    }
}

fn pick_group(rng: &mut StdRng) -> GroupProfile {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for profile in GROUPS {
        cumulative += profile.share;
        if roll < cumulative {
            return profile;
        }
    }
    GROUPS[GROUPS.len() - 1]
}

fn approval_target(features: &LegacyFeatures, income_component: f64) -> f64 {
    0.003 * (features.credit_score - 600.0) + 0.05 * features.income_stability
        - 0.2 * f64::from(features.eviction_history)
        - 0.2 * f64::from(features.criminal_history)
        + 0.05 * features.employment_years
        + 0.1 * features.savings_ratio
        + 0.03 * features.rental_history_years
        + 0.25 * income_component
}

/// Project a generated applicant onto the new intake fields. Rent, debt and the
/// monthly history are not part of the legacy draw, so they are sampled here.
fn intake_record(rng: &mut StdRng, draw: &Draw) -> ApplicantRecord {
    let income = draw.monthly_income;
    let voucher_f = f64::from(draw.legacy.voucher);

    let monthly_rent = normal(rng, 1300.0, 250.0).clamp(600.0, 3000.0);
    let liquid_savings = draw.legacy.savings_ratio * income * 6.0;
    let monthly_debt = income * normal(rng, 0.12 + 0.08 * voucher_f, 0.05).clamp(0.0, 0.6);

    let swing = income * (1.0 - draw.legacy.income_stability / 100.0) * 0.5;
    let income_history = (0..HISTORY_MONTHS)
        .map(|_| (income + normal(rng, 0.0, swing)).max(0.0))
        .collect();

    ApplicantRecord {
        monthly_income: income,
        monthly_rent,
        liquid_savings,
        monthly_debt,
        income_history: Some(income_history),
    }
}

fn normal(rng: &mut StdRng, mean: f64, sd: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sd * z
}

use crate::infra::build_service;
use clap::{ArgGroup, Args};
use fair_tenant::error::AppError;
use fair_tenant::screening::legacy::{write_training_rows, TrainingRow};
use fair_tenant::screening::synthetic::DEFAULT_SEED;
use fair_tenant::screening::{
    generate_population, parse_audit_batch, write_audit_batch, ApplicantRecord, AuditReport,
    ComparisonReport, ExplanationEntry, LabeledApplicant, ScoreResponse,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ApplicantArgs {
    /// Gross monthly income
    #[arg(long)]
    pub(crate) income: f64,
    /// Monthly rent of the unit applied for
    #[arg(long)]
    pub(crate) rent: f64,
    /// Liquid savings available today
    #[arg(long, default_value_t = 0.0)]
    pub(crate) savings: f64,
    /// Recurring monthly debt payments
    #[arg(long, default_value_t = 0.0)]
    pub(crate) debt: f64,
    /// Recent monthly incomes, oldest first (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub(crate) history: Vec<f64>,
    /// Train the legacy model from this CSV instead of APP_TRAINING_DATA
    #[arg(long)]
    pub(crate) training_data: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ApplicantArgs {
    pub(crate) fn record(&self) -> ApplicantRecord {
        let record = ApplicantRecord::new(self.income, self.rent, self.savings, self.debt);
        if self.history.is_empty() {
            record
        } else {
            record.with_income_history(self.history.clone())
        }
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "synthetic"])))]
pub(crate) struct AuditArgs {
    /// CSV batch with a `group` column and the intake fields
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Audit a generated population of this size instead of a CSV batch
    #[arg(long)]
    pub(crate) synthetic: Option<usize>,
    /// Seed for the generated population
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,
    /// Approval threshold (defaults to APP_APPROVAL_THRESHOLD)
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Group every other group is compared against (defaults to the most favored)
    #[arg(long)]
    pub(crate) reference_group: Option<String>,
    /// Train the legacy model from this CSV instead of APP_TRAINING_DATA
    #[arg(long)]
    pub(crate) training_data: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Destination of the legacy training table
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Number of applicants to generate
    #[arg(long, default_value_t = 1000)]
    pub(crate) count: usize,
    /// Random seed; the same seed always yields the same population
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,
    /// Also write the population in the audit batch layout
    #[arg(long)]
    pub(crate) audit_output: Option<PathBuf>,
}

pub(crate) fn run_score(args: ApplicantArgs) -> Result<(), AppError> {
    let service = build_service(args.training_data.clone())?;
    let response = service.score(&args.record())?;

    if args.json {
        return print_json(&response);
    }
    render_score(&response);
    Ok(())
}

pub(crate) fn run_compare(args: ApplicantArgs) -> Result<(), AppError> {
    let service = build_service(args.training_data.clone())?;
    let report = service.compare(&args.record())?;

    if args.json {
        return print_json(&report);
    }
    render_comparison(&report);
    Ok(())
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let AuditArgs {
        input,
        synthetic,
        seed,
        threshold,
        reference_group,
        training_data,
        json,
    } = args;

    let service = build_service(training_data)?;
    let batch: Vec<LabeledApplicant> = match (input, synthetic) {
        (Some(path), _) => parse_audit_batch(BufReader::new(File::open(path)?))?,
        (None, Some(count)) => generate_population(count, seed)
            .iter()
            .map(|applicant| applicant.labeled())
            .collect(),
        (None, None) => Vec::new(),
    };

    let report = service.audit(&batch, threshold, reference_group)?;
    if json {
        return print_json(&report);
    }
    render_audit(&report);
    Ok(())
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let GenerateArgs {
        output,
        count,
        seed,
        audit_output,
    } = args;

    let population = generate_population(count, seed);
    let rows: Vec<TrainingRow> = population
        .iter()
        .map(|applicant| applicant.training_row())
        .collect();
    write_training_rows(BufWriter::new(File::create(&output)?), &rows)
        .map_err(std::io::Error::from)?;
    println!("Wrote {} training rows to {}", rows.len(), output.display());

    if let Some(path) = audit_output {
        let batch: Vec<LabeledApplicant> = population
            .iter()
            .map(|applicant| applicant.labeled())
            .collect();
        write_audit_batch(BufWriter::new(File::create(&path)?), &batch)
            .map_err(std::io::Error::from)?;
        println!("Wrote {} audit applicants to {}", batch.len(), path.display());
    }

    let mut by_group: BTreeMap<&str, usize> = BTreeMap::new();
    for applicant in &population {
        *by_group.entry(applicant.group.as_str()).or_default() += 1;
    }
    for (group, total) in by_group {
        println!("  {group:<10} {total}");
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{body}");
    Ok(())
}

fn render_score(response: &ScoreResponse) {
    println!(
        "Score: {} ({} risk)",
        response.score,
        response.risk_level.label()
    );
    render_breakdown(&response.breakdown);
}

fn render_breakdown(entries: &[ExplanationEntry]) {
    for entry in entries {
        println!(
            "  {:<22} {:<10} {:<9} {}",
            entry.name,
            entry.value,
            entry.status.label(),
            entry.explanation
        );
    }
}

fn render_comparison(report: &ComparisonReport) {
    let fair = &report.new_model;
    let legacy = &report.legacy_model;

    println!(
        "New model:    {:>6} ({} risk)  expected missed months {:.2}, annual loss {:.2}",
        fair.score,
        fair.risk_level.label(),
        fair.impact.expected_missed_months,
        fair.impact.expected_annual_loss
    );
    println!(
        "Legacy model: {:>6.2}             expected missed months {:.2}, annual loss {:.2}",
        legacy.score, legacy.impact.expected_missed_months, legacy.impact.expected_annual_loss
    );
    render_breakdown(&fair.breakdown);
}

fn render_audit(report: &AuditReport) {
    println!(
        "Disparity audit of {} applicants at threshold {:.0} ({})",
        report.applicants,
        report.threshold,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for model in &report.models {
        println!(
            "\n{} (reference: {})",
            model.model,
            model.reference_group.as_deref().unwrap_or("none")
        );
        println!(
            "  {:<12} {:>6} {:>8} {:>6} {:>6} {:>8}",
            "group", "count", "approved", "rate", "ratio", "gap"
        );
        for group in &model.groups {
            println!(
                "  {:<12} {:>6} {:>8} {:>6} {:>6} {:>8}{}",
                group.group,
                group.applicants,
                group.approved,
                fmt_optional(group.approval_rate, 2),
                fmt_optional(group.disparity_ratio, 2),
                fmt_optional(group.mean_score_gap, 1),
                if group.adverse_impact {
                    "  adverse impact"
                } else {
                    ""
                }
            );
        }
    }
}

fn fmt_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.precision$}"))
}

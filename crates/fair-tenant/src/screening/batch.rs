use serde::{Deserialize, Deserializer};
use std::io::{Read, Write};

use super::audit::LabeledApplicant;
use super::domain::ApplicantRecord;
use super::error::ScreeningError;

const REQUIRED_COLUMNS: [&str; 5] = [
    "group",
    "monthly_income",
    "monthly_rent",
    "liquid_savings",
    "monthly_debt",
];

/// Parse an uploaded audit table.
///
/// `income_history` is optional and holds `;`-separated monthly amounts.
pub fn parse_audit_batch<R: Read>(reader: R) -> Result<Vec<LabeledApplicant>, ScreeningError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(format_error)?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(ScreeningError::UnsupportedFormat(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut applicants = Vec::new();
    for (index, row) in csv_reader.deserialize::<AuditRow>().enumerate() {
        let row = row.map_err(format_error)?;
        let income_history = row
            .income_history
            .as_deref()
            .map(parse_history)
            .transpose()
            .map_err(|_| {
                ScreeningError::UnsupportedFormat(format!(
                    "row {}: income_history must be ';'-separated numbers",
                    index + 1
                ))
            })?;

        applicants.push(LabeledApplicant {
            group: row.group,
            record: ApplicantRecord {
                monthly_income: row.monthly_income,
                monthly_rent: row.monthly_rent,
                liquid_savings: row.liquid_savings,
                monthly_debt: row.monthly_debt,
                income_history,
            },
        });
    }

    Ok(applicants)
}

/// Write a batch in the layout [`parse_audit_batch`] reads.
pub fn write_audit_batch<W: Write>(
    writer: W,
    batch: &[LabeledApplicant],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REQUIRED_COLUMNS.iter().chain(std::iter::once(&"income_history")))?;

    for applicant in batch {
        let record = &applicant.record;
        let history = record
            .income_history
            .as_deref()
            .map(|values| {
                values
                    .iter()
                    .map(|value| format!("{value:.2}"))
                    .collect::<Vec<_>>()
                    .join(";")
            })
            .unwrap_or_default();

        csv_writer.write_record([
            applicant.group.clone(),
            format!("{:.2}", record.monthly_income),
            format!("{:.2}", record.monthly_rent),
            format!("{:.2}", record.liquid_savings),
            format!("{:.2}", record.monthly_debt),
            history,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn format_error(err: csv::Error) -> ScreeningError {
    ScreeningError::UnsupportedFormat(err.to_string())
}

fn parse_history(raw: &str) -> Result<Vec<f64>, std::num::ParseFloatError> {
    raw.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<f64>)
        .collect()
}

#[derive(Debug, Deserialize)]
struct AuditRow {
    group: String,
    monthly_income: f64,
    monthly_rent: f64,
    liquid_savings: f64,
    monthly_debt: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    income_history: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

use super::domain::ImpactEstimate;
use super::policy::MAX_MISSED_MONTHS_PER_YEAR;

/// Expected rent shortfall implied by a score.
///
/// Scores outside 0-100 are clamped so a legacy score can be fed in directly.
pub fn calculate_impact(score: f64, monthly_rent: f64) -> ImpactEstimate {
    let score = score.clamp(0.0, 100.0);
    let expected_missed_months = ((100.0 - score) / 100.0) * MAX_MISSED_MONTHS_PER_YEAR;
    let expected_annual_loss = expected_missed_months * monthly_rent;

    ImpactEstimate {
        expected_missed_months: round2(expected_missed_months),
        expected_annual_loss: round2(expected_annual_loss),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

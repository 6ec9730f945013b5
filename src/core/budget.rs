/// Score returned when either the fee or the budget is unknown
pub const NEUTRAL_BUDGET_SCORE: f64 = 0.5;

/// Calculate budget score (0-1)
///
/// A fee within budget scores 1.0. Above budget the score decays smoothly as
/// `1 / (1 + overshoot)`, where overshoot is relative to the budget, so a fee
/// twice the budget still scores 0.5.
#[inline]
pub fn score_budget(therapist_fee: Option<f64>, patient_budget: Option<f64>) -> f64 {
    let (fee, budget) = match (therapist_fee, patient_budget) {
        (Some(fee), Some(budget)) if fee > 0.0 && budget > 0.0 => (fee, budget),
        _ => return NEUTRAL_BUDGET_SCORE,
    };

    if fee <= budget {
        return 1.0;
    }

    let ratio = (fee - budget) / budget;
    (1.0 / (1.0 + ratio)).clamp(0.0, 1.0)
}

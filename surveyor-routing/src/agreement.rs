//! Agreement between internal and external predictions, 0–100.

use surveyor_core::models::DamagePrediction;

const SEVERITY_POINTS: f64 = 50.0;
const DAMAGE_TYPE_POINTS: f64 = 30.0;
const PROBABILITY_POINTS: f64 = 20.0;
const MAX_SEVERITY_DISTANCE: f64 = 3.0;

/// `50·(1 − |Δseverity|/3) + 30·[same damage type] + 20·(1 − |Δprobability|)`.
pub fn agreement_score(internal: &DamagePrediction, external: &DamagePrediction) -> f64 {
    let severity_gap =
        (f64::from(internal.severity.ordinal()) - f64::from(external.severity.ordinal())).abs();
    let severity = SEVERITY_POINTS * (1.0 - severity_gap / MAX_SEVERITY_DISTANCE);

    let same_type = internal
        .damage_type
        .trim()
        .eq_ignore_ascii_case(external.damage_type.trim());
    let damage_type = if same_type { DAMAGE_TYPE_POINTS } else { 0.0 };

    // A non-finite probability counts as total disagreement.
    let probability_gap = (internal.damage_probability - external.damage_probability).abs();
    let probability_gap = if probability_gap.is_finite() {
        probability_gap.min(1.0)
    } else {
        1.0
    };
    let probability = PROBABILITY_POINTS * (1.0 - probability_gap);

    (severity + damage_type + probability).clamp(0.0, 100.0)
}

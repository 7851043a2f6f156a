//! Probability adjustment utilities
//!
//! All functions are pure so they can be tested without a full GameState.

use crate::models::PlayType;

// ============================================================================
// Odds-ratio blend
// ============================================================================

const ODDS_EPS: f64 = 1e-4;

fn odds(p: f64) -> f64 {
    let p = p.clamp(ODDS_EPS, 1.0 - ODDS_EPS);
    p / (1.0 - p)
}

/// Combine two tendencies relative to a shared baseline:
/// `or = odds(p1) * odds(p2) / odds(baseline)`, returned as `or / (1 + or)`.
/// Inputs are clamped to `[1e-4, 1 - 1e-4]`.
pub fn odds_ratio_blend(p1: f64, p2: f64, baseline: f64) -> f64 {
    let ratio = odds(p1) * odds(p2) / odds(baseline);
    ratio / (1.0 + ratio)
}

// ============================================================================
// Distribution shaping
// ============================================================================

/// Clamp to non-negative and rescale to sum 1. All-zero input stays zero
/// (the sampler treats it as uniform).
pub fn normalize(probs: &mut [f64]) {
    for p in probs.iter_mut() {
        if !p.is_finite() || *p < 0.0 {
            *p = 0.0;
        }
    }
    let total: f64 = probs.iter().sum();
    if total > 0.0 {
        for p in probs.iter_mut() {
            *p /= total;
        }
    }
}

/// Add pass-over-expected (fraction) to pass and take it from run.
pub fn apply_pass_tendency(probs: &mut [f64; 4], pass_oe: f64) {
    probs[PlayType::Pass.index()] += pass_oe;
    probs[PlayType::Run.index()] -= pass_oe;
}

/// Move `share` of one group's mass onto the other.
///
/// Positive `aggressiveness` moves mass from {field_goal, punt} to {run, pass};
/// negative moves it back. The magnitude is clamped to 1, so the shift never
/// exceeds the donor side's mass. Donors give up mass in proportion to their
/// own probabilities; recipients receive it in proportion to theirs, or
/// evenly when the recipient side is empty.
pub fn fourth_down_shift(probs: &mut [f64; 4], aggressiveness: f64) {
    if !aggressiveness.is_finite() || aggressiveness == 0.0 {
        return;
    }
    for p in probs.iter_mut() {
        *p = p.max(0.0);
    }
    let go = [PlayType::Run.index(), PlayType::Pass.index()];
    let kick = [PlayType::FieldGoal.index(), PlayType::Punt.index()];
    let (donors, recipients) = if aggressiveness > 0.0 { (kick, go) } else { (go, kick) };

    let donor_mass: f64 = donors.iter().map(|&i| probs[i]).sum();
    let moved = donor_mass * aggressiveness.abs().min(1.0);
    if moved <= 0.0 {
        return;
    }
    for &i in &donors {
        probs[i] -= moved * probs[i] / donor_mass;
    }
    let recipient_mass: f64 = recipients.iter().map(|&i| probs[i]).sum();
    for &i in &recipients {
        let share = if recipient_mass > 0.0 { probs[i] / recipient_mass } else { 0.5 };
        probs[i] += moved * share;
    }
    normalize(probs);
}

/// Shift the mass of `index` by `delta` (result clamped to [0, 1]) and
/// spread the remainder over the other classes proportionally.
pub fn shift_class_mass(probs: &mut [f64], index: usize, delta: f64) {
    normalize(probs);
    if index >= probs.len() {
        return;
    }
    let target = (probs[index] + delta).clamp(0.0, 1.0);
    let rest_before: f64 = 1.0 - probs[index];
    let rest_after = 1.0 - target;
    let others = probs.len() - 1;
    for (i, p) in probs.iter_mut().enumerate() {
        if i == index {
            *p = target;
        } else if rest_before > 0.0 {
            *p *= rest_after / rest_before;
        } else if others > 0 {
            *p = rest_after / others as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_blend_identity_at_baseline() {
        // Offense at league average leaves the defense rate unchanged.
        assert!(approx(odds_ratio_blend(0.06, 0.09, 0.06), 0.09));
        assert!(approx(odds_ratio_blend(0.06, 0.06, 0.06), 0.06));
    }

    #[test]
    fn test_blend_is_symmetric_and_monotone() {
        assert!(approx(odds_ratio_blend(0.08, 0.05, 0.06), odds_ratio_blend(0.05, 0.08, 0.06)));
        assert!(odds_ratio_blend(0.08, 0.07, 0.06) > odds_ratio_blend(0.08, 0.06, 0.06));
    }

    #[test]
    fn test_blend_clamps_extremes() {
        let p = odds_ratio_blend(1.0, 1.0, 0.0);
        assert!(p.is_finite() && p < 1.0);
        let p = odds_ratio_blend(0.0, 0.5, 0.5);
        assert!(p > 0.0 && p < 1e-3);
    }

    #[test]
    fn test_pass_tendency_moves_mass() {
        let mut p = [0.5, 0.4, 0.08, 0.02];
        apply_pass_tendency(&mut p, 0.05);
        assert!(approx(p[PlayType::Pass.index()], 0.55));
        assert!(approx(p[PlayType::Run.index()], 0.35));
    }

    #[test]
    fn test_fourth_down_shift_bounded_by_donor() {
        let mut p = [0.1, 0.1, 0.5, 0.3];
        fourth_down_shift(&mut p, 5.0);
        assert!(approx(p[PlayType::Punt.index()], 0.0));
        assert!(approx(p[PlayType::FieldGoal.index()], 0.0));
        assert!(approx(p[PlayType::Pass.index()] + p[PlayType::Run.index()], 1.0));

        let mut p = [0.1, 0.1, 0.5, 0.3];
        fourth_down_shift(&mut p, 0.5);
        assert!(approx(p[PlayType::Punt.index()], 0.25));
        assert!(approx(p[PlayType::FieldGoal.index()], 0.15));
        assert!(approx(p[PlayType::Pass.index()], 0.3));
        assert!(approx(p.iter().sum::<f64>(), 1.0));
    }

    #[test]
    fn test_conservative_shift_moves_to_kicks() {
        let mut p = [0.4, 0.4, 0.2, 0.0];
        fourth_down_shift(&mut p, -0.5);
        assert!(approx(p[PlayType::Pass.index()], 0.2));
        assert!(approx(p[PlayType::Punt.index()], 0.6));
        assert!(approx(p[PlayType::FieldGoal.index()], 0.0));
    }

    #[test]
    fn test_shift_into_empty_side_splits_evenly() {
        let mut p = [0.0, 0.0, 0.6, 0.4];
        fourth_down_shift(&mut p, 0.5);
        assert!(approx(p[PlayType::Pass.index()], 0.25));
        assert!(approx(p[PlayType::Run.index()], 0.25));
    }

    #[test]
    fn test_shift_class_mass_renormalizes_rest() {
        let mut p = vec![0.2, 0.5, 0.3];
        shift_class_mass(&mut p, 1, 0.1);
        assert!(approx(p[1], 0.6));
        assert!(approx(p[0], 0.16));
        assert!(approx(p[2], 0.24));

        let mut p = vec![0.1, 0.9];
        shift_class_mass(&mut p, 1, 0.5);
        assert!(approx(p[1], 1.0));
        assert!(approx(p[0], 0.0));
    }

    #[test]
    fn test_normalize_clamps_negatives() {
        let mut p = [0.6, -0.1, 0.4, f64::NAN];
        normalize(&mut p);
        assert!(approx(p[0], 0.6));
        assert_eq!(p[1], 0.0);
        assert_eq!(p[3], 0.0);
    }
}

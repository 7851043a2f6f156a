//! Fantasy scoring rules
//!
//! Defaults match a "Half PPR" league. Presets cover the other common
//! formats; custom leagues load from JSON or YAML.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 판타지 점수 규칙
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    // === Rushing / Receiving ===
    pub rush_td: f64,
    pub rush_yard: f64,
    pub rec_td: f64,
    pub rec_yard: f64,
    pub reception: f64,

    // === Passing ===
    pub pass_td: f64,
    pub pass_yard: f64,
    /// Interception thrown (usually negative)
    pub intercept: f64,
    /// Sack taken by the passer
    pub sack: f64,
    pub fumble_lost: f64,

    // === Kicking ===
    pub fg_0_39: f64,
    pub fg_40_49: f64,
    pub fg_50_plus: f64,
    pub pat_made: f64,

    // === Team defense ===
    pub def_sack: f64,
    pub def_int: f64,
    pub def_fumble_rec: f64,
    pub def_safety: f64,
    pub def_td: f64,

    // === Points allowed tiers ===
    pub pa_0: f64,
    pub pa_1_6: f64,
    pub pa_7_13: f64,
    pub pa_14_20: f64,
    pub pa_21_27: f64,
    pub pa_28_34: f64,
    pub pa_35_plus: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::half_ppr()
    }
}

impl ScoringRules {
    pub fn half_ppr() -> Self {
        Self {
            rush_td: 6.0,
            rush_yard: 0.1,
            rec_td: 6.0,
            rec_yard: 0.1,
            reception: 0.5,

            pass_td: 4.0,
            pass_yard: 0.04,
            intercept: -1.5,
            sack: 0.0,
            fumble_lost: -2.0,

            fg_0_39: 3.0,
            fg_40_49: 4.0,
            fg_50_plus: 5.0,
            pat_made: 1.0,

            def_sack: 1.0,
            def_int: 2.0,
            def_fumble_rec: 2.0,
            def_safety: 2.0,
            def_td: 6.0,

            pa_0: 10.0,
            pa_1_6: 7.0,
            pa_7_13: 4.0,
            pa_14_20: 1.0,
            pa_21_27: 0.0,
            pa_28_34: -1.0,
            pa_35_plus: -4.0,
        }
    }

    pub fn ppr() -> Self {
        Self { reception: 1.0, ..Self::half_ppr() }
    }

    pub fn standard() -> Self {
        Self { reception: 0.0, ..Self::half_ppr() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Defense points for the opponent's final score.
    pub fn points_allowed(&self, points: u32) -> f64 {
        match points {
            0 => self.pa_0,
            1..=6 => self.pa_1_6,
            7..=13 => self.pa_7_13,
            14..=20 => self.pa_14_20,
            21..=27 => self.pa_21_27,
            28..=34 => self.pa_28_34,
            _ => self.pa_35_plus,
        }
    }

    /// Kicker points for a made field goal of `distance` yards.
    pub fn field_goal_points(&self, distance: f64) -> f64 {
        if distance <= 39.0 {
            self.fg_0_39
        } else if distance <= 49.0 {
            self.fg_40_49
        } else {
            self.fg_50_plus
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_allowed_tiers() {
        let rules = ScoringRules::default();
        assert_eq!(rules.points_allowed(0), 10.0);
        assert_eq!(rules.points_allowed(6), 7.0);
        assert_eq!(rules.points_allowed(7), 4.0);
        assert_eq!(rules.points_allowed(20), 1.0);
        assert_eq!(rules.points_allowed(21), 0.0);
        assert_eq!(rules.points_allowed(34), -1.0);
        assert_eq!(rules.points_allowed(35), -4.0);
        assert_eq!(rules.points_allowed(63), -4.0);
    }

    #[test]
    fn test_field_goal_tiers() {
        let rules = ScoringRules::default();
        assert_eq!(rules.field_goal_points(39.0), 3.0);
        assert_eq!(rules.field_goal_points(39.5), 4.0);
        assert_eq!(rules.field_goal_points(49.0), 4.0);
        assert_eq!(rules.field_goal_points(52.0), 5.0);
    }

    #[test]
    fn test_presets_differ_only_in_reception() {
        let half = ScoringRules::half_ppr();
        let full = ScoringRules::ppr();
        let std = ScoringRules::standard();
        assert_eq!(full.reception, 1.0);
        assert_eq!(std.reception, 0.0);
        assert_eq!(ScoringRules { reception: 0.5, ..full }, half);
    }

    #[test]
    fn test_partial_yaml_overrides_defaults() {
        let yaml = "pass_td: 6.0\nreception: 1.0\n";
        let rules = ScoringRules::from_yaml(yaml).unwrap();
        assert_eq!(rules.pass_td, 6.0);
        assert_eq!(rules.reception, 1.0);
        assert_eq!(rules.rush_yard, 0.1);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(ScoringRules::from_json("{\"pass_td\": \"six\"}").is_err());
    }
}

//! Engine Configuration
//!
//! Fixed football constants and rates used by play resolution.
//! Travels inside the model bundle so a bundle fully determines a trial.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 엔진 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Turnovers ===
    /// Fumble lost chance on runs and sacks (기본: 0.008)
    pub fumble_rate: f64,

    // === Kicking ===
    /// Extra point make chance (기본: 0.93)
    pub extra_point_rate: f64,
    /// Net punt distance (기본: 45)
    pub punt_net_yards: f64,
    /// Line of scrimmage to kick distance (기본: 17)
    pub kick_distance_offset: f64,
    /// Yard line after a kickoff or touchback (기본: 75)
    pub touchback_yard_line: f64,

    // === Passing ===
    /// Yards lost on a sack (기본: 7)
    pub sack_yards: f64,
    /// Shift applied before scaling air yards (기본: 15)
    pub air_yards_shift: f64,
    /// Deepest catchable point past the goal line (기본: 10)
    pub end_zone_depth: f64,
    /// QB share of the combined CPOE adjustment (기본: 0.75)
    pub qb_cpoe_weight: f64,

    // === Field zones ===
    /// 레드존 (기본: 20)
    pub red_zone: f64,
    /// 골라인 (기본: 3)
    pub goal_line: f64,

    /// Minimum seconds any snap consumes.
    pub min_runoff: f64,

    /// Mirror the interception spot into the returning team's frame.
    /// Off by default: the spot keeps the passing team's yard line.
    pub mirror_interception_spot: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fumble_rate: 0.008,

            extra_point_rate: 0.93,
            punt_net_yards: 45.0,
            kick_distance_offset: 17.0,
            touchback_yard_line: 75.0,

            sack_yards: 7.0,
            air_yards_shift: 15.0,
            end_zone_depth: 10.0,
            qb_cpoe_weight: 0.75,

            red_zone: 20.0,
            goal_line: 3.0,

            min_runoff: 1.0,

            mirror_interception_spot: false,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Rates outside [0, 1] or non-positive distances.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let rates = [
            ("fumble_rate", self.fumble_rate),
            ("extra_point_rate", self.extra_point_rate),
            ("qb_cpoe_weight", self.qb_cpoe_weight),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("{name} must be within [0, 1], got {rate}"));
            }
        }
        if !(self.touchback_yard_line > 0.0 && self.touchback_yard_line < 100.0) {
            return Err(format!("touchback_yard_line out of field: {}", self.touchback_yard_line));
        }
        if !(self.min_runoff > 0.0) {
            return Err("min_runoff must be positive".into());
        }
        if self.goal_line > self.red_zone {
            return Err("goal_line must be inside red_zone".into());
        }
        Ok(())
    }
}

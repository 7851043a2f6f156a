//! Player records consumed by the engine
//!
//! Every estimator is optional. Accessors resolve missing or non-finite
//! values to neutral defaults so the engine never has to.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    K,
    #[serde(other)]
    Other,
}

/// 선수 스냅샷 (id + read-only 추정치)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub position: Position,

    // === Usage shares ===
    /// 캐리 점유율 (가중치)
    pub carry_share: Option<f64>,
    pub red_zone_carry_share: Option<f64>,
    pub goal_line_carry_share: Option<f64>,
    /// Observed carry percentage; a carrier is eligible when this is > 0.
    pub carry_pct: Option<f64>,
    /// 타겟 점유율 (가중치)
    pub target_share: Option<f64>,
    /// Observed target percentage; a target is eligible when this is > 0.
    pub target_pct: Option<f64>,

    // === Efficiency ===
    pub relative_ypc: Option<f64>,
    pub relative_yac: Option<f64>,
    pub relative_air_yards: Option<f64>,
    /// QB CPOE (%p)
    pub cpoe: Option<f64>,
    /// Receiver CPOE (%p)
    pub receiver_cpoe: Option<f64>,
    pub scramble_rate: Option<f64>,
    pub relative_yards_per_scramble: Option<f64>,
    #[serde(default)]
    pub is_mobile: Option<bool>,
    /// Field goal % over expected (%p)
    pub fgoe: Option<f64>,

    // === Starter selection ===
    #[serde(default)]
    pub starting_qb: bool,
    #[serde(default)]
    pub starting_k: bool,
    #[serde(default)]
    pub pass_attempts: f64,
    #[serde(default)]
    pub kick_attempts: f64,
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

impl PlayerRecord {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            carry_share: None,
            red_zone_carry_share: None,
            goal_line_carry_share: None,
            carry_pct: None,
            target_share: None,
            target_pct: None,
            relative_ypc: None,
            relative_yac: None,
            relative_air_yards: None,
            cpoe: None,
            receiver_cpoe: None,
            scramble_rate: None,
            relative_yards_per_scramble: None,
            is_mobile: None,
            fgoe: None,
            starting_qb: false,
            starting_k: false,
            pass_attempts: 0.0,
            kick_attempts: 0.0,
        }
    }

    /// Eligible ball carrier. Falls back to the share estimate when no
    /// observed percentage is present.
    pub fn is_carrier(&self) -> bool {
        self.carry_pct.or(self.carry_share).is_some_and(|v| v > 0.0)
    }

    pub fn is_target(&self) -> bool {
        self.target_pct.or(self.target_share).is_some_and(|v| v > 0.0)
    }

    pub fn relative_ypc(&self) -> f64 {
        finite_or(self.relative_ypc, 1.0)
    }

    pub fn relative_yac(&self) -> f64 {
        finite_or(self.relative_yac, 1.0)
    }

    pub fn relative_air_yards(&self) -> f64 {
        finite_or(self.relative_air_yards, 1.0)
    }

    pub fn relative_yards_per_scramble(&self) -> f64 {
        finite_or(self.relative_yards_per_scramble, 1.0)
    }

    pub fn cpoe(&self) -> f64 {
        finite_or(self.cpoe, 0.0)
    }

    pub fn receiver_cpoe(&self) -> f64 {
        finite_or(self.receiver_cpoe, 0.0)
    }

    pub fn scramble_rate(&self) -> f64 {
        finite_or(self.scramble_rate, 0.0).clamp(0.0, 1.0)
    }

    pub fn fgoe(&self) -> f64 {
        finite_or(self.fgoe, 0.0)
    }
}

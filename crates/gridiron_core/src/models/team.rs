use serde::{Deserialize, Serialize};

use super::player::PlayerRecord;

/// Which of the two participating teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];

    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }
}

fn default_sack_rate() -> f64 {
    0.06
}

fn default_int_rate() -> f64 {
    0.02
}

fn neutral() -> f64 {
    1.0
}

/// 팀 성향 추정치 (read-only per game)
///
/// Over-expected values are in percentage points, relative values are
/// multipliers around 1.0. Missing fields fall back to league-average values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSplits {
    /// 공격 패스 비율 - 기대치 (%p)
    #[serde(default)]
    pub offense_pass_oe: f64,
    /// 수비 상대 패스 비율 - 기대치 (%p)
    #[serde(default)]
    pub defense_pass_oe: f64,

    #[serde(default = "default_sack_rate")]
    pub offense_sack_rate: f64,
    #[serde(default = "default_sack_rate")]
    pub defense_sack_rate: f64,
    #[serde(default = "default_sack_rate")]
    pub league_sack_rate: f64,

    #[serde(default = "default_int_rate")]
    pub defense_int_rate: f64,
    /// 허용 CPOE (%p, 음수 = 억제)
    #[serde(default)]
    pub defense_cpoe: f64,

    #[serde(default = "neutral")]
    pub defense_relative_yac: f64,
    #[serde(default = "neutral")]
    pub defense_relative_air_yards: f64,
    #[serde(default = "neutral")]
    pub defense_relative_ypc: f64,

    /// 4th-down go-for-it tendency in [-1, 1]; positive moves kick mass to run/pass.
    #[serde(default)]
    pub fourth_down_aggressiveness: f64,
}

impl Default for TeamSplits {
    fn default() -> Self {
        Self {
            offense_pass_oe: 0.0,
            defense_pass_oe: 0.0,
            offense_sack_rate: default_sack_rate(),
            defense_sack_rate: default_sack_rate(),
            league_sack_rate: default_sack_rate(),
            defense_int_rate: default_int_rate(),
            defense_cpoe: 0.0,
            defense_relative_yac: 1.0,
            defense_relative_air_yards: 1.0,
            defense_relative_ypc: 1.0,
            fourth_down_aggressiveness: 0.0,
        }
    }
}

/// One team's pre-game snapshot: ledger key, tendencies and roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    /// Team abbreviation, also the defense's ledger key.
    pub abbr: String,
    #[serde(default)]
    pub splits: TeamSplits,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
}

impl TeamSnapshot {
    pub fn new(abbr: impl Into<String>) -> Self {
        Self { abbr: abbr.into(), splits: TeamSplits::default(), players: Vec::new() }
    }
}

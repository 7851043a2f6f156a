use serde::{Deserialize, Serialize};

use super::team::TeamSide;

/// Offensive play call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Pass,
    Run,
    Punt,
    FieldGoal,
}

impl PlayType {
    pub const ALL: [PlayType; 4] = [PlayType::Pass, PlayType::Run, PlayType::Punt, PlayType::FieldGoal];

    /// Classifier label for this play type.
    pub fn label(self) -> &'static str {
        match self {
            PlayType::Pass => "pass",
            PlayType::Run => "run",
            PlayType::Punt => "punt",
            PlayType::FieldGoal => "field_goal",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "pass" => Some(PlayType::Pass),
            "run" | "rush" => Some(PlayType::Run),
            "punt" => Some(PlayType::Punt),
            "field_goal" | "fieldgoal" | "fg" => Some(PlayType::FieldGoal),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayType::Pass => 0,
            PlayType::Run => 1,
            PlayType::Punt => 2,
            PlayType::FieldGoal => 3,
        }
    }
}

/// Result of one snap, before football rules are applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayOutcome {
    pub play_type: Option<PlayType>,
    pub yards: f64,
    pub air_yards: f64,
    pub touchdown: bool,
    pub turnover: bool,
    pub sack: bool,
    pub scramble: bool,
    pub complete: bool,
    pub interception: bool,
    pub fumble: bool,
    pub safety: bool,
    /// Field goal made
    pub kick_good: bool,
    /// Ball carrier, target or kicker
    pub player_id: Option<String>,
    /// Quarterback on pass plays
    pub passer_id: Option<String>,
}

impl PlayOutcome {
    pub fn new(play_type: PlayType) -> Self {
        Self { play_type: Some(play_type), ..Default::default() }
    }
}

/// 플레이 로그 레코드 (snap 직전 상황 + 결과)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayLogEntry {
    pub quarter: u8,
    pub seconds_remaining: f64,
    pub down: u8,
    pub yards_to_go: f64,
    pub yard_line: f64,
    pub posteam: TeamSide,
    pub score_diff: i32,
    pub play_type: PlayType,
    pub yards: f64,
    pub complete: bool,
    pub player_id: Option<String>,
    /// Quarterback on pass plays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passer_id: Option<String>,
    pub drive_play: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for play in PlayType::ALL {
            assert_eq!(PlayType::from_label(play.label()), Some(play));
        }
        assert_eq!(PlayType::from_label(" FG "), Some(PlayType::FieldGoal));
        assert_eq!(PlayType::from_label("kneel"), None);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, play) in PlayType::ALL.iter().enumerate() {
            assert_eq!(play.index(), i);
        }
    }
}

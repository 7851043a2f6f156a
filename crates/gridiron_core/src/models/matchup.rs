use serde::{Deserialize, Serialize};

use super::team::{TeamSide, TeamSnapshot};
use crate::error::{Result, SimError};

/// 경기 환경 (날씨, 베팅 라인)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameContext {
    /// Wind speed (mph)
    pub wind: f64,
    pub is_outdoors: bool,
    /// Vegas over/under
    pub vegas_total: f64,
    /// Home spread; negative when home is favored
    pub home_spread: f64,
}

impl Default for GameContext {
    fn default() -> Self {
        Self { wind: 0.0, is_outdoors: true, vegas_total: 44.0, home_spread: 0.0 }
    }
}

impl GameContext {
    /// Spread from the point of view of `side`.
    pub fn spread_for(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Home => self.home_spread,
            TeamSide::Away => -self.home_spread,
        }
    }
}

/// Both teams and the environment for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: TeamSnapshot,
    pub away: TeamSnapshot,
    #[serde(default)]
    pub context: GameContext,
}

impl Matchup {
    pub fn new(home: TeamSnapshot, away: TeamSnapshot) -> Self {
        Self { home, away, context: GameContext::default() }
    }

    pub fn with_context(mut self, context: GameContext) -> Self {
        self.context = context;
        self
    }

    pub fn team(&self, side: TeamSide) -> &TeamSnapshot {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    /// Team abbreviations double as ledger keys and must be distinct.
    pub fn validate(&self) -> Result<()> {
        if self.home.abbr.is_empty() || self.away.abbr.is_empty() {
            return Err(SimError::InvalidMatchup("team abbreviation is empty".into()));
        }
        if self.home.abbr == self.away.abbr {
            return Err(SimError::InvalidMatchup(format!(
                "home and away are both {}",
                self.home.abbr
            )));
        }
        let context = &self.context;
        if !(context.wind.is_finite() && context.vegas_total.is_finite() && context.home_spread.is_finite()) {
            return Err(SimError::InvalidMatchup("game context has non-finite values".into()));
        }
        Ok(())
    }
}

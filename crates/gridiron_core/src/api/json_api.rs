//! JSON entry points
//!
//! String-in / string-out wrappers around `GameState` and `run_trials` for
//! callers that hold a loaded bundle but speak JSON.

use serde::{Deserialize, Serialize};

use crate::engine::{GameOutcome, GameState, ModelBundle};
use crate::error::{Result, SimError};
use crate::models::{Matchup, ScoringRules};
use crate::projection::{run_trials, ProjectionConfig, ProjectionSummary};

pub const SCHEMA_VERSION: u8 = 1;

fn default_schema() -> u8 {
    SCHEMA_VERSION
}

fn check_schema(version: u8) -> Result<()> {
    if version != SCHEMA_VERSION {
        return Err(SimError::UnsupportedSchema(version));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameRequest {
    #[serde(default = "default_schema")]
    pub schema_version: u8,
    pub seed: u64,
    pub matchup: Matchup,
    #[serde(default)]
    pub rules: ScoringRules,
    /// Include the per-snap play log in the response
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub fingerprint: String,
    pub outcome: GameOutcome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionRequest {
    #[serde(default = "default_schema")]
    pub schema_version: u8,
    pub matchup: Matchup,
    #[serde(default)]
    pub rules: ScoringRules,
    #[serde(default)]
    pub config: ProjectionConfig,
}

/// Simulate one game from a JSON [`GameRequest`].
pub fn simulate_game_json(bundle: &ModelBundle, request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let GameRequest { seed, matchup, rules, trace, .. } = request;
    let outcome = GameState::new(bundle, &matchup, &rules, seed)?.with_trace(trace).play_game()?;

    let response = GameResponse {
        schema_version: SCHEMA_VERSION,
        seed,
        fingerprint: outcome.fingerprint(),
        outcome,
    };
    Ok(serde_json::to_string(&response)?)
}

/// Run a multi-trial projection from a JSON [`ProjectionRequest`];
/// returns a serialized [`ProjectionSummary`].
pub fn project_game_json(bundle: &ModelBundle, request_json: &str) -> Result<String> {
    let request: ProjectionRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let summary: ProjectionSummary =
        run_trials(bundle, &request.matchup, &request.rules, &request.config)?;
    Ok(serde_json::to_string(&summary)?)
}

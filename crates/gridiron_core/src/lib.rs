//! # gridiron_core - Deterministic Football Game Simulation for Fantasy Projections
//!
//! Play-by-play Monte-Carlo simulator of a single American football game.
//! Every snap draws from supplied classifiers and yardage sample buffers,
//! and every resolved play feeds a per-player fantasy ledger.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same ledger and play log)
//! - Configurable scoring rules (half PPR, PPR, standard presets)
//! - Shared read-only model bundle, parallel trials via rayon
//! - JSON API for easy integration with projection tooling

// Game engine APIs often require many parameters
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod projection;

pub use api::{project_game_json, simulate_game_json, GameRequest, GameResponse, ProjectionRequest};
pub use engine::{
    BundleSpec, ClockTable, EngineConfig, GameOutcome, GameState, ModelBundle, SampleBank,
};
pub use error::{InferenceError, Result, SimError, SnapContext};
pub use models::{
    GameContext, Matchup, PlayType, PlayerRecord, Position, ScoringRules, TeamSide, TeamSnapshot,
    TeamSplits,
};
pub use projection::{percentile, run_trials, PlayerProjection, ProjectionConfig, ProjectionSummary};

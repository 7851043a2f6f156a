pub mod matchup;
pub mod play;
pub mod player;
pub mod scoring;
pub mod team;

pub use matchup::{GameContext, Matchup};
pub use play::{PlayLogEntry, PlayOutcome, PlayType};
pub use player::{PlayerRecord, Position};
pub use scoring::ScoringRules;
pub use team::{TeamSide, TeamSnapshot, TeamSplits};

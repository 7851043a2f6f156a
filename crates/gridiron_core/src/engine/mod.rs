//! Game simulation engine
//!
//! Collaborators (classifiers, sample buffers, clock table) live in an
//! immutable [`ModelBundle`]; a [`GameState`] borrows it for one trial.

pub mod bundle;
pub mod clock;
pub mod config;
pub mod game;
pub mod ledger;
pub mod probability;
pub mod providers;
pub mod roster;
pub mod samples;
pub mod selection;

#[cfg(test)]
pub mod test_fixtures;

pub use bundle::{BundleSpec, ModelBundle};
pub use clock::{ClockRow, ClockTable};
pub use config::EngineConfig;
pub use game::{GameOutcome, GameState};
pub use ledger::{FantasyLedger, StatLine};
pub use providers::{Classifier, ClassifierSpec, FixedProbabilities, LogisticModel};
pub use samples::{PositionBuckets, SampleBank, SampleBuffer};

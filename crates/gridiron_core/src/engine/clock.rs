//! Clock runoff model
//!
//! Empirical mean runoff per (quarter bucket, time bucket, score bucket,
//! play detail), with a fixed formula for keys the table does not cover.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::models::PlayType;

// ============================================================================
// Buckets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuarterBucket {
    #[serde(rename = "regulation")]
    Regulation,
    #[serde(rename = "Q4")]
    Fourth,
    #[serde(rename = "OT")]
    Overtime,
}

impl QuarterBucket {
    pub fn of(quarter: u8) -> Self {
        match quarter {
            q if q >= 5 => QuarterBucket::Overtime,
            4 => QuarterBucket::Fourth,
            _ => QuarterBucket::Regulation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    High,
    Mid,
    Low,
}

impl TimeBucket {
    pub fn of(seconds_remaining: f64) -> Self {
        if seconds_remaining > 300.0 {
            TimeBucket::High
        } else if seconds_remaining > 120.0 {
            TimeBucket::Mid
        } else {
            TimeBucket::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBucket {
    TrailingBig,
    TrailingClose,
    Tied,
    LeadingClose,
    LeadingBig,
}

impl ScoreBucket {
    /// `diff` is from the possessing team's point of view.
    pub fn of(diff: i32) -> Self {
        if diff >= 9 {
            ScoreBucket::LeadingBig
        } else if diff > 0 {
            ScoreBucket::LeadingClose
        } else if diff == 0 {
            ScoreBucket::Tied
        } else if diff > -9 {
            ScoreBucket::TrailingClose
        } else {
            ScoreBucket::TrailingBig
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayDetail {
    PassComplete,
    PassIncomplete,
    Run,
    Punt,
    FieldGoal,
}

impl PlayDetail {
    /// Sacks keep the clock running like a completion; scrambles count as passes
    /// here and are separated in the fallback formula.
    pub fn of(play_type: PlayType, complete: bool, sack: bool) -> Self {
        match play_type {
            PlayType::Pass if sack || complete => PlayDetail::PassComplete,
            PlayType::Pass => PlayDetail::PassIncomplete,
            PlayType::Run => PlayDetail::Run,
            PlayType::Punt => PlayDetail::Punt,
            PlayType::FieldGoal => PlayDetail::FieldGoal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockKey {
    pub quarter: QuarterBucket,
    pub time: TimeBucket,
    pub score: ScoreBucket,
    pub detail: PlayDetail,
}

/// One tabulated row, in the layout of the runoff export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockRow {
    pub qtr_bucket: QuarterBucket,
    pub time_bucket: TimeBucket,
    pub score_bucket: ScoreBucket,
    pub play_type_detail: PlayDetail,
    pub mean: f64,
}

impl ClockRow {
    pub fn key(&self) -> ClockKey {
        ClockKey {
            quarter: self.qtr_bucket,
            time: self.time_bucket,
            score: self.score_bucket,
            detail: self.play_type_detail,
        }
    }
}

// ============================================================================
// Snap facts used for the lookup
// ============================================================================

/// What the clock needs to know about the snap that just ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapClock {
    pub quarter: u8,
    pub seconds_remaining: f64,
    /// Possessing team's lead after the play.
    pub score_diff: i32,
    pub play_type: PlayType,
    pub complete: bool,
    pub sack: bool,
    pub scramble: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ClockTable {
    means: FxHashMap<ClockKey, f64>,
}

impl ClockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later rows for the same key replace earlier ones. Non-finite or
    /// negative means are skipped.
    pub fn from_rows(rows: &[ClockRow]) -> Self {
        let means = rows
            .iter()
            .filter(|r| r.mean.is_finite() && r.mean >= 0.0)
            .map(|r| (r.key(), r.mean))
            .collect();
        Self { means }
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn lookup(&self, key: &ClockKey) -> Option<f64> {
        self.means.get(key).copied()
    }

    /// Seconds consumed by the snap.
    pub fn runoff(&self, snap: &SnapClock) -> f64 {
        let key = ClockKey {
            quarter: QuarterBucket::of(snap.quarter),
            time: TimeBucket::of(snap.seconds_remaining),
            score: ScoreBucket::of(snap.score_diff),
            detail: PlayDetail::of(snap.play_type, snap.complete, snap.sack),
        };
        self.lookup(&key).unwrap_or_else(|| fallback_runoff(snap))
    }
}

/// Formula used when the table has no entry for a key.
pub fn fallback_runoff(snap: &SnapClock) -> f64 {
    let stopped = match snap.play_type {
        PlayType::Pass => !snap.complete && !snap.sack && !snap.scramble,
        PlayType::Punt | PlayType::FieldGoal => true,
        PlayType::Run => false,
    };
    if stopped {
        return 5.0;
    }
    if snap.quarter == 4 {
        if snap.score_diff > 0 {
            45.0
        } else if snap.seconds_remaining < 300.0 {
            10.0
        } else {
            30.0
        }
    } else {
        35.0
    }
}

//! Clock and period transitions
//!
//! Runoff is subtracted after every snap. Crossing the two-minute mark in
//! Q2 or Q4 stops at exactly 120 seconds. At zero:
//! - end of Q2: second-half kickoff
//! - end of Q4: game over, or overtime when tied
//! - end of an overtime period: game over
//! otherwise the next quarter starts (900 s regulation, 600 s overtime).

use rand::Rng;

use super::GameState;
use crate::engine::clock::SnapClock;
use crate::models::{PlayOutcome, PlayType, TeamSide};

const TWO_MINUTE_WARNING: f64 = 120.0;
const REGULATION_QUARTER: f64 = 900.0;
const OVERTIME_PERIOD: f64 = 600.0;

impl<'a> GameState<'a> {
    pub(super) fn advance_clock(&mut self, outcome: &PlayOutcome) {
        let snap = SnapClock {
            quarter: self.quarter,
            seconds_remaining: self.seconds_remaining,
            score_diff: self.score_differential(),
            play_type: outcome.play_type.unwrap_or(PlayType::Run),
            complete: outcome.complete,
            sack: outcome.sack,
            scramble: outcome.scramble,
        };
        let bundle = self.bundle;
        let runoff = bundle.clock.runoff(&snap).max(self.config().min_runoff);
        self.run_clock(runoff);
    }

    /// Subtract `runoff` seconds and handle period boundaries.
    pub fn run_clock(&mut self, runoff: f64) {
        let before = self.seconds_remaining;
        self.seconds_remaining -= runoff;

        if matches!(self.quarter, 2 | 4)
            && before > TWO_MINUTE_WARNING
            && self.seconds_remaining < TWO_MINUTE_WARNING
        {
            self.seconds_remaining = TWO_MINUTE_WARNING;
        }

        if self.seconds_remaining > 0.0 {
            return;
        }

        match self.quarter {
            2 => self.half_time(),
            4 => {
                if self.scores[0] != self.scores[1] {
                    self.game_over = true;
                } else {
                    self.start_overtime();
                }
            }
            q if q >= 5 => self.game_over = true,
            _ => {}
        }

        if !self.game_over {
            self.quarter += 1;
            self.seconds_remaining =
                if self.quarter <= 4 { REGULATION_QUARTER } else { OVERTIME_PERIOD };
        }
    }

    /// Team that did not receive the opening kickoff gets the ball at its 25.
    pub fn half_time(&mut self) {
        self.posteam = self.second_half_receiver;
        self.drive_plays = 0;
        self.yard_line = self.config().touchback_yard_line;
        self.first_down();
    }

    /// Random first possession; the quarter itself advances in `run_clock`.
    pub fn start_overtime(&mut self) {
        self.in_overtime = true;
        self.ot_possessions = 0;
        self.ot_first_drive_score = 0;
        self.posteam = if self.rng.gen::<bool>() { TeamSide::Home } else { TeamSide::Away };
        self.drive_plays = 0;
        self.yard_line = self.config().touchback_yard_line;
        self.first_down();
    }
}

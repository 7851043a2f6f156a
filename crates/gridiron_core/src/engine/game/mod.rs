//! GameState - one simulated game
//!
//! Finite-state machine over score, clock, down and field position.
//! `play_game()` runs the opening kickoff, advances snaps until a terminal
//! condition, then applies points-allowed defense scoring.
//!
//! Yard line convention: distance from the possessing team to the goal line
//! it attacks. A drive starting at its own 25 is at 75.
//!
//! Split across files:
//! - `mod.rs`: state, snap loop, football rules (downs, scores, turnovers)
//! - `resolve.rs`: play-call and per-play-type resolution
//! - `periods.rs`: clock runoff, half-time, overtime

mod periods;
mod resolve;


use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::bundle::ModelBundle;
use super::config::EngineConfig;
use super::ledger::FantasyLedger;
use super::roster::PlayerPool;
use crate::error::{InferenceError, Result, SimError, SnapContext};
use crate::models::{
    GameContext, Matchup, PlayLogEntry, PlayOutcome, PlayType, ScoringRules, TeamSide, TeamSplits,
};

/// Final result of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub overtime: bool,
    pub snaps: u32,
    pub ledger: FantasyLedger,
    /// Empty unless tracing was enabled.
    pub play_log: Vec<PlayLogEntry>,
}

impl GameOutcome {
    /// SHA-256 over the serialized ledger and play log, for golden-master checks.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        if let Ok(bytes) = serde_json::to_vec(&self.ledger) {
            hasher.update(&bytes);
        }
        if let Ok(bytes) = serde_json::to_vec(&self.play_log) {
            hasher.update(&bytes);
        }
        format!("{:x}", hasher.finalize())
    }
}

pub struct GameState<'a> {
    bundle: &'a ModelBundle,
    matchup: &'a Matchup,
    rules: &'a ScoringRules,
    pools: [PlayerPool<'a>; 2],
    rng: ChaCha8Rng,

    // === Clock ===
    quarter: u8,
    seconds_remaining: f64,

    // === Field ===
    yard_line: f64,
    down: u8,
    yards_to_go: f64,

    // === Possession & score ===
    posteam: TeamSide,
    second_half_receiver: TeamSide,
    scores: [u32; 2],

    // === Overtime ===
    in_overtime: bool,
    ot_possessions: u32,
    /// 3 after a first-possession field goal, else 0
    ot_first_drive_score: u32,

    game_over: bool,
    drive_plays: u32,
    snaps: u32,

    ledger: FantasyLedger,
    trace: bool,
    play_log: Vec<PlayLogEntry>,
}

impl<'a> GameState<'a> {
    pub fn new(
        bundle: &'a ModelBundle,
        matchup: &'a Matchup,
        rules: &'a ScoringRules,
        seed: u64,
    ) -> Result<Self> {
        matchup.validate()?;
        let pools = [
            PlayerPool::new(&matchup.home.abbr, &matchup.home.players),
            PlayerPool::new(&matchup.away.abbr, &matchup.away.players),
        ];
        Ok(Self {
            bundle,
            matchup,
            rules,
            pools,
            rng: ChaCha8Rng::seed_from_u64(seed),
            quarter: 0,
            seconds_remaining: 900.0,
            yard_line: 75.0,
            down: 1,
            yards_to_go: 10.0,
            posteam: TeamSide::Home,
            second_half_receiver: TeamSide::Away,
            scores: [0, 0],
            in_overtime: false,
            ot_possessions: 0,
            ot_first_drive_score: 0,
            game_over: false,
            drive_plays: 0,
            snaps: 0,
            ledger: FantasyLedger::new(),
            trace: false,
            play_log: Vec::new(),
        })
    }

    /// Record a [`PlayLogEntry`] for every snap.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    // ========================================================================
    // Game loop
    // ========================================================================

    pub fn play_game(mut self) -> Result<GameOutcome> {
        self.opening_kickoff();
        while !self.game_over {
            self.advance_snap()?;
        }

        let matchup = self.matchup;
        let home = &matchup.home.abbr;
        let away = &matchup.away.abbr;
        let (home_score, away_score) = (self.scores[0], self.scores[1]);
        self.ledger.credit_points_allowed(self.rules, home, away_score);
        self.ledger.credit_points_allowed(self.rules, away, home_score);

        debug!(
            "{} {} - {} {} after {} snaps{}",
            home,
            home_score,
            away_score,
            away,
            self.snaps,
            if self.in_overtime { " (OT)" } else { "" }
        );

        Ok(GameOutcome {
            home: home.clone(),
            away: away.clone(),
            home_score,
            away_score,
            overtime: self.in_overtime,
            snaps: self.snaps,
            ledger: self.ledger,
            play_log: self.play_log,
        })
    }

    /// Resolve exactly one snap and run the clock.
    pub fn advance_snap(&mut self) -> Result<()> {
        let before = self.log_stub();
        let play_type = self.choose_playcall()?;
        self.drive_plays += 1;
        self.snaps += 1;

        let outcome = self.resolve(play_type)?;

        if self.trace {
            self.play_log.push(PlayLogEntry {
                play_type,
                yards: outcome.yards,
                complete: outcome.complete,
                player_id: outcome.player_id.clone(),
                passer_id: outcome.passer_id.clone(),
                ..before
            });
        }

        if !self.game_over {
            self.advance_clock(&outcome);
        }
        Ok(())
    }

    fn log_stub(&self) -> PlayLogEntry {
        PlayLogEntry {
            quarter: self.quarter,
            seconds_remaining: self.seconds_remaining,
            down: self.down,
            yards_to_go: self.yards_to_go,
            yard_line: self.yard_line,
            posteam: self.posteam,
            score_diff: self.score_differential(),
            play_type: PlayType::Run,
            yards: 0.0,
            complete: false,
            player_id: None,
            passer_id: None,
            drive_play: self.drive_plays + 1,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn seconds_remaining(&self) -> f64 {
        self.seconds_remaining
    }

    pub fn down(&self) -> u8 {
        self.down
    }

    pub fn yards_to_go(&self) -> f64 {
        self.yards_to_go
    }

    pub fn yard_line(&self) -> f64 {
        self.yard_line
    }

    pub fn posteam(&self) -> TeamSide {
        self.posteam
    }

    pub fn defteam(&self) -> TeamSide {
        self.posteam.opponent()
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        self.scores[side.index()]
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn in_overtime(&self) -> bool {
        self.in_overtime
    }

    pub fn ledger(&self) -> &FantasyLedger {
        &self.ledger
    }

    pub fn play_log(&self) -> &[PlayLogEntry] {
        &self.play_log
    }

    /// Possessing team's lead.
    pub fn score_differential(&self) -> i32 {
        self.scores[self.posteam.index()] as i32 - self.scores[self.defteam().index()] as i32
    }

    fn config(&self) -> &'a EngineConfig {
        let bundle: &'a ModelBundle = self.bundle;
        &bundle.config
    }

    fn context(&self) -> &'a GameContext {
        let matchup: &'a Matchup = self.matchup;
        &matchup.context
    }

    fn splits(&self, side: TeamSide) -> &'a TeamSplits {
        let matchup: &'a Matchup = self.matchup;
        &matchup.team(side).splits
    }

    fn abbr(&self, side: TeamSide) -> &'a str {
        let matchup: &'a Matchup = self.matchup;
        &matchup.team(side).abbr
    }

    fn snap_context(&self) -> SnapContext {
        SnapContext {
            quarter: self.quarter,
            seconds_remaining: self.seconds_remaining,
            down: self.down,
            yards_to_go: self.yards_to_go,
            yard_line: self.yard_line,
            posteam: self.posteam,
        }
    }

    /// Attach the snap situation to a classifier failure.
    fn inference<T>(
        &self,
        model: &'static str,
        result: std::result::Result<T, InferenceError>,
    ) -> Result<T> {
        result.map_err(|source| SimError::ModelInference {
            model,
            source,
            context: self.snap_context(),
        })
    }

    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    // ========================================================================
    // Possession and downs
    // ========================================================================

    pub fn opening_kickoff(&mut self) {
        self.posteam = if self.rng.gen::<bool>() { TeamSide::Home } else { TeamSide::Away };
        self.second_half_receiver = self.posteam.opponent();
        self.quarter = 1;
        self.seconds_remaining = 900.0;
        self.drive_plays = 0;
        self.yard_line = self.config().touchback_yard_line;
        self.first_down();
    }

    pub fn kickoff(&mut self) {
        self.change_possession();
        self.yard_line = self.config().touchback_yard_line;
        self.first_down();
    }

    pub fn first_down(&mut self) {
        self.down = 1;
        self.yards_to_go = self.yard_line.min(10.0);
    }

    pub fn change_possession(&mut self) {
        self.posteam = self.posteam.opponent();
        self.drive_plays = 0;
        if self.in_overtime {
            self.ot_possessions += 1;
        }
    }

    /// A team chasing a first-possession overtime field goal lost the ball.
    fn check_overtime_chase(&mut self) {
        if self.in_overtime && self.ot_possessions == 2 && self.ot_first_drive_score == 3 {
            self.game_over = true;
        }
    }

    pub fn turnover_on_downs(&mut self) {
        self.change_possession();
        self.check_overtime_chase();
        self.yard_line = (100.0 - self.yard_line).max(1.0);
        self.first_down();
    }

    // ========================================================================
    // Scoring
    // ========================================================================

    fn add_points(&mut self, side: TeamSide, points: u32) {
        debug_assert!(matches!(points, 1 | 2 | 3 | 6));
        self.scores[side.index()] += points;
    }

    /// Six points to the possessing team, then the try and kickoff.
    fn touchdown(&mut self) {
        let scorer = self.posteam;
        self.add_points(scorer, 6);
        if self.in_overtime {
            self.game_over = true;
            return;
        }
        self.extra_point();
    }

    /// Fixed-rate try by the possessing team's kicker, always followed by the kickoff.
    fn extra_point(&mut self) {
        let scorer = self.posteam;
        if self.roll() < self.config().extra_point_rate {
            self.add_points(scorer, 1);
            let kicker = self.pools[scorer.index()].kicker();
            self.ledger.credit_extra_point(self.rules, &kicker.id);
        }
        self.kickoff();
    }

    /// Two points to the defense; the scored-upon team kicks off.
    fn safety(&mut self) {
        let defense = self.defteam();
        self.add_points(defense, 2);
        let abbr = self.abbr(defense);
        self.ledger.credit_safety(self.rules, abbr);
        if self.in_overtime {
            self.game_over = true;
        }
        self.kickoff();
    }

    // ========================================================================
    // Ball-carrier result
    // ========================================================================

    /// Apply a gain (negative = loss) by the possessing team.
    ///
    /// Priority: fumble, touchdown, safety, first down, down progression.
    /// Returns the yards to credit, clamped to what the field allowed.
    fn apply_gain(&mut self, yards: f64, fumble: bool) -> Gain {
        if fumble {
            let spot = (self.yard_line - yards).clamp(0.0, 100.0);
            let credited = self.yard_line - spot;
            self.change_possession();
            self.check_overtime_chase();
            let recovered_at = 100.0 - spot;
            self.yard_line = if recovered_at >= 100.0 {
                self.config().touchback_yard_line
            } else {
                recovered_at.max(1.0)
            };
            self.first_down();
            return Gain { yards: credited, touchdown: false, safety: false, turnover: true };
        }

        if yards >= self.yard_line {
            let credited = self.yard_line;
            self.touchdown();
            return Gain { yards: credited, touchdown: true, safety: false, turnover: false };
        }

        if self.yard_line - yards > 100.0 {
            let credited = -(100.0 - self.yard_line);
            self.safety();
            return Gain { yards: credited, touchdown: false, safety: true, turnover: false };
        }

        self.yard_line -= yards;
        if yards >= self.yards_to_go {
            self.first_down();
        } else if self.down >= 4 {
            self.turnover_on_downs();
            return Gain { yards, touchdown: false, safety: false, turnover: true };
        } else {
            self.down += 1;
            self.yards_to_go -= yards;
        }
        Gain { yards, touchdown: false, safety: false, turnover: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gain {
    yards: f64,
    touchdown: bool,
    safety: bool,
    turnover: bool,
}

impl Gain {
    fn into_outcome(self, mut outcome: PlayOutcome) -> PlayOutcome {
        outcome.yards = self.yards;
        outcome.touchdown = self.touchdown;
        outcome.safety = self.safety;
        outcome.turnover |= self.turnover;
        outcome
    }
}

//! Play Resolution
//!
//! Play-call selection and per-play-type outcomes for GameState:
//! - Play call (classifier + team tendencies + 4th-down shift)
//! - Run (zone carrier pools, rush buffers, fumbles)
//! - Pass (sack, scramble, interception, air yards, completion, YAC)
//! - Punt and field goal (including overtime kick rules)

use super::GameState;
use crate::engine::probability::{
    apply_pass_tendency, fourth_down_shift, normalize, odds_ratio_blend, shift_class_mass,
};
use crate::engine::roster::{Actor, FieldZone};
use crate::engine::selection::weighted_choice;
use crate::error::Result;
use crate::models::{PlayOutcome, PlayType};

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl<'a> GameState<'a> {
    // ===========================================
    // Play call
    // ===========================================

    pub fn choose_playcall(&mut self) -> Result<PlayType> {
        let offense = self.posteam;
        let context = self.context();
        let features = [
            f64::from(self.down),
            self.yards_to_go,
            f64::from(self.score_differential()),
            self.seconds_remaining,
            f64::from(self.quarter),
            self.yard_line,
            context.vegas_total,
            context.spread_for(offense),
            f64::from(self.drive_plays),
        ];
        let bundle = self.bundle;
        let mut probs = self.inference("playcall", bundle.playcall.probabilities(&features))?;

        let pass_oe = (self.splits(offense).offense_pass_oe
            + self.splits(offense.opponent()).defense_pass_oe)
            / 100.0;
        apply_pass_tendency(&mut probs, pass_oe);
        if self.down == 4 {
            fourth_down_shift(&mut probs, self.splits(offense).fourth_down_aggressiveness);
        }
        normalize(&mut probs);

        Ok(weighted_choice(&mut self.rng, &probs).map_or(PlayType::Run, |i| PlayType::ALL[i]))
    }

    pub(super) fn resolve(&mut self, play_type: PlayType) -> Result<PlayOutcome> {
        match play_type {
            PlayType::Run => Ok(self.run_play()),
            PlayType::Pass => self.pass_play(),
            PlayType::Punt => Ok(self.punt()),
            PlayType::FieldGoal => self.field_goal(),
        }
    }

    // ===========================================
    // Run
    // ===========================================

    fn run_play(&mut self) -> PlayOutcome {
        let config = self.config();
        let offense = self.posteam;
        let recovering = self.abbr(offense.opponent());
        let zone = FieldZone::of(self.yard_line, config);

        let carrier = self.pools[offense.index()].choose_carrier(&mut self.rng, zone);
        let yards = self.carry_yards(&carrier, zone);
        let fumble = self.roll() < config.fumble_rate;

        let gain = self.apply_gain(yards, fumble);
        self.ledger.credit_rush(self.rules, &carrier.id, gain.yards, gain.touchdown);
        if fumble {
            self.ledger.credit_fumble(self.rules, &carrier.id, recovering);
        }

        let mut outcome = PlayOutcome::new(PlayType::Run);
        outcome.fumble = fumble;
        outcome.turnover = fumble;
        outcome.player_id = Some(carrier.id.into_owned());
        gain.into_outcome(outcome)
    }

    fn carry_yards(&mut self, carrier: &Actor<'a>, zone: FieldZone) -> f64 {
        let bundle = self.bundle;
        let raw = bundle.samples.rush(zone.is_red_zone()).draw(&mut self.rng);
        let carrier_ypc = carrier.record.map_or(1.0, |p| p.relative_ypc());
        raw * carrier_ypc * self.splits(self.defteam()).defense_relative_ypc
    }

    // ===========================================
    // Pass
    // ===========================================

    pub(super) fn pass_play(&mut self) -> Result<PlayOutcome> {
        let config = self.config();
        let offense = self.posteam;
        let defense = offense.opponent();
        let offense_splits = self.splits(offense);
        let defense_splits = self.splits(defense);
        let defense_abbr = self.abbr(defense);

        let qb = self.pools[offense.index()].quarterback();
        let mut outcome = PlayOutcome::new(PlayType::Pass);
        outcome.passer_id = Some(qb.id.to_string());

        let sack_rate = odds_ratio_blend(
            offense_splits.offense_sack_rate,
            defense_splits.defense_sack_rate,
            offense_splits.league_sack_rate,
        );
        if self.roll() < sack_rate {
            let fumble = self.roll() < config.fumble_rate;
            let gain = self.apply_gain(-config.sack_yards, fumble);
            self.ledger.credit_sack(self.rules, &qb.id, defense_abbr);
            if fumble {
                self.ledger.credit_fumble(self.rules, &qb.id, defense_abbr);
            }
            outcome.sack = true;
            outcome.fumble = fumble;
            outcome.turnover = fumble;
            outcome.player_id = Some(qb.id.into_owned());
            return Ok(gain.into_outcome(outcome));
        }

        let scramble_rate = qb.record.map_or(0.0, |p| p.scramble_rate());
        if self.roll() < scramble_rate {
            let yards = self.scramble_yards(&qb);
            let gain = self.apply_gain(yards, false);
            self.ledger.credit_rush(self.rules, &qb.id, gain.yards, gain.touchdown);
            outcome.scramble = true;
            outcome.player_id = Some(qb.id.into_owned());
            return Ok(gain.into_outcome(outcome));
        }

        let intercepted = self.roll() < defense_splits.defense_int_rate;
        let zone = FieldZone::of(self.yard_line, config);
        let target = self.pools[offense.index()].choose_target(&mut self.rng);
        let air_yards = self.air_yards(&target, zone);
        outcome.player_id = Some(target.id.to_string());
        outcome.air_yards = air_yards;

        if intercepted {
            self.ledger.credit_interception(self.rules, &qb.id, defense_abbr);
            outcome.touchdown = self.intercept(air_yards);
            outcome.interception = true;
            outcome.turnover = true;
            return Ok(outcome);
        }

        if !self.is_complete(air_yards, &qb, &target)? {
            let gain = self.apply_gain(0.0, false);
            return Ok(gain.into_outcome(outcome));
        }

        let yac = self.yards_after_catch(&target, zone);
        let gain = self.apply_gain(air_yards + yac, false);
        self.ledger.credit_completion(self.rules, &qb.id, &target.id, gain.yards, gain.touchdown);
        outcome.complete = true;
        Ok(gain.into_outcome(outcome))
    }

    pub(super) fn scramble_yards(&mut self, qb: &Actor<'a>) -> f64 {
        let bundle = self.bundle;
        let mobility = qb.record.and_then(|p| p.is_mobile);
        let raw = bundle.samples.scramble(mobility).draw(&mut self.rng);
        raw * qb.record.map_or(1.0, |p| p.relative_yards_per_scramble())
    }

    /// Shifted multiplicative scaling keeps negative (behind the line)
    /// samples from flipping sign when scaled.
    pub(super) fn air_yards(&mut self, target: &Actor<'a>, zone: FieldZone) -> f64 {
        let config = self.config();
        let bundle = self.bundle;
        let base = bundle.samples.air_yards(target.position()).draw(&mut self.rng);
        let shift = config.air_yards_shift;

        let mut air = base;
        if base + shift > 0.0 {
            let relative = target.record.map_or(1.0, |p| p.relative_air_yards());
            air = (base + shift) * relative - shift;
            if zone == FieldZone::Open {
                air *= self.splits(self.defteam()).defense_relative_air_yards;
            }
        }
        air.min(self.yard_line + config.end_zone_depth)
    }

    fn yards_after_catch(&mut self, target: &Actor<'a>, zone: FieldZone) -> f64 {
        let bundle = self.bundle;
        let raw = bundle.samples.yac(target.position(), zone.is_red_zone()).draw(&mut self.rng);
        if raw > 0.0 {
            let relative = target.record.map_or(1.0, |p| p.relative_yac());
            raw * relative * self.splits(self.defteam()).defense_relative_yac
        } else {
            raw
        }
    }

    /// Completion roll. Offense CPOE blends QB and receiver; both it and the
    /// defense's CPOE allowed are applied around the model baseline.
    pub fn is_complete(&mut self, air_yards: f64, qb: &Actor<'a>, target: &Actor<'a>) -> Result<bool> {
        let config = self.config();
        let context = self.context();
        let features = [
            f64::from(self.down),
            self.yards_to_go,
            self.yard_line,
            air_yards,
            context.wind,
            flag(context.is_outdoors),
        ];
        let bundle = self.bundle;
        let base =
            self.inference("completion", bundle.completion.success_probability(&features))?;

        let qb_cpoe = qb.record.map_or(0.0, |p| p.cpoe()) / 100.0;
        let receiver_cpoe = target.record.map_or(0.0, |p| p.receiver_cpoe()) / 100.0;
        let offense_cpoe =
            config.qb_cpoe_weight * qb_cpoe + (1.0 - config.qb_cpoe_weight) * receiver_cpoe;
        let defense_cpoe = self.splits(self.defteam()).defense_cpoe / 100.0;

        let p = odds_ratio_blend(base + offense_cpoe, base + defense_cpoe, base);
        Ok(self.roll() < p)
    }

    /// Ball is spotted at the end of the air yards, possession flips, then
    /// the return is run back from there. Returns true on a pick-six.
    pub(super) fn intercept(&mut self, air_yards: f64) -> bool {
        let config = self.config();
        let spot = self.yard_line - air_yards;
        self.change_possession();
        self.check_overtime_chase();

        let bundle = self.bundle;
        let return_yards = bundle.samples.int_return().draw(&mut self.rng);
        let start = if config.mirror_interception_spot { 100.0 - spot } else { spot };
        let after = start - return_yards;

        if after <= 0.0 {
            let abbr = self.abbr(self.posteam);
            self.ledger.credit_defensive_td(self.rules, abbr);
            self.touchdown();
            return true;
        }
        self.yard_line = if after >= 100.0 { config.touchback_yard_line } else { after };
        self.first_down();
        false
    }

    // ===========================================
    // Kicks
    // ===========================================

    /// Fixed net distance; touchback only when the ball would cross the goal line.
    pub fn punt(&mut self) -> PlayOutcome {
        let config = self.config();
        let net = config.punt_net_yards.min(self.yard_line);
        let landing = self.yard_line - config.punt_net_yards;

        self.change_possession();
        self.check_overtime_chase();
        self.yard_line = if landing < 0.0 { config.touchback_yard_line } else { 100.0 - landing };
        self.first_down();

        let mut outcome = PlayOutcome::new(PlayType::Punt);
        outcome.yards = net;
        outcome
    }

    pub fn field_goal(&mut self) -> Result<PlayOutcome> {
        let config = self.config();
        let context = self.context();
        let offense = self.posteam;
        let distance = self.yard_line + config.kick_distance_offset;
        let features = [
            f64::from(self.score_differential()),
            self.seconds_remaining,
            f64::from(self.quarter),
            distance,
            context.wind,
            flag(context.is_outdoors),
        ];
        let bundle = self.bundle;
        let mut probs = self.inference("field_goal", bundle.field_goal.probabilities(&features))?;

        let kicker = self.pools[offense.index()].kicker();
        let made_column = bundle.field_goal.success_column();
        let fgoe = kicker.record.map_or(0.0, |p| p.fgoe()) / 100.0;
        shift_class_mass(&mut probs, made_column, fgoe);
        let made = weighted_choice(&mut self.rng, &probs) == Some(made_column);

        let mut outcome = PlayOutcome::new(PlayType::FieldGoal);
        outcome.yards = distance;
        outcome.kick_good = made;
        outcome.player_id = Some(kicker.id.to_string());

        if made {
            self.ledger.credit_field_goal(self.rules, &kicker.id, distance);
            self.add_points(offense, 3);
            if self.in_overtime {
                match self.ot_possessions {
                    0 => {
                        self.ot_first_drive_score = 3;
                        self.kickoff();
                    }
                    // Answers a first-drive field goal: sudden death from here.
                    1 if self.ot_first_drive_score == 3 => self.kickoff(),
                    _ => self.game_over = true,
                }
            } else {
                self.kickoff();
            }
        } else {
            if self.in_overtime && self.ot_possessions == 1 && self.ot_first_drive_score == 3 {
                self.game_over = true;
            }
            self.turnover_on_downs();
        }
        Ok(outcome)
    }
}

//! Test Fixtures Module
//!
//! Shared builders for engine tests: a small but complete model bundle
//! backed by fixed-probability classifiers, and two realistic rosters.
//!
//! ## Usage
//! ```rust,ignore
//! use crate::engine::test_fixtures::*;
//! ```

use super::bundle::{BundleSpec, ModelBundle};
use super::providers::{
    ClassifierSpec, FixedProbabilities, COMPLETION_FEATURES, FIELD_GOAL_FEATURES,
    PLAYCALL_FEATURES,
};
use super::samples::{PositionBuckets, SampleBank, SampleBuffer};
use crate::models::{Matchup, PlayerRecord, Position, TeamSnapshot, TeamSplits};

// =============================================================================
// Bundle Helpers
// =============================================================================

/// Play-call prior with the given pass / run / punt / field goal weights.
pub fn playcall(pass: f64, run: f64, punt: f64, field_goal: f64) -> ClassifierSpec {
    ClassifierSpec::Fixed(FixedProbabilities::new(
        &["field_goal", "pass", "punt", "run"],
        &[field_goal, pass, punt, run],
        PLAYCALL_FEATURES,
    ))
}

pub fn completion(p_complete: f64) -> ClassifierSpec {
    ClassifierSpec::Fixed(FixedProbabilities::new(
        &["0", "1"],
        &[1.0 - p_complete, p_complete],
        COMPLETION_FEATURES,
    ))
}

pub fn field_goal(p_made: f64) -> ClassifierSpec {
    ClassifierSpec::Fixed(FixedProbabilities::new(
        &["missed", "made"],
        &[1.0 - p_made, p_made],
        FIELD_GOAL_FEATURES,
    ))
}

fn buffer(values: &[f64]) -> SampleBuffer {
    SampleBuffer::new(values.to_vec())
}

/// Coarse league-like yardage buffers.
pub fn sample_bank() -> SampleBank {
    SampleBank {
        rush_open: buffer(&[-3.0, -1.0, 0.0, 1.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 6.0, 8.0, 11.0, 18.0, 35.0]),
        rush_red_zone: buffer(&[-2.0, 0.0, 1.0, 1.0, 2.0, 3.0, 4.0, 6.0]),
        scramble: buffer(&[1.0, 3.0, 5.0, 7.0, 9.0, 14.0]),
        scramble_mobile: buffer(&[3.0, 6.0, 8.0, 12.0, 20.0]),
        scramble_pocket: buffer(&[0.0, 2.0, 3.0, 5.0]),
        int_return: buffer(&[0.0, 4.0, 9.0, 15.0, 28.0]),
        air_yards: PositionBuckets {
            all: buffer(&[-2.0, 3.0, 6.0, 9.0, 14.0, 22.0]),
            rb: buffer(&[-4.0, -2.0, 0.0, 1.0, 3.0]),
            wr: buffer(&[2.0, 5.0, 9.0, 12.0, 18.0, 30.0]),
            te: buffer(&[1.0, 4.0, 7.0, 10.0, 14.0]),
        },
        yac_open: PositionBuckets {
            all: buffer(&[0.0, 2.0, 3.0, 5.0, 9.0]),
            rb: buffer(&[2.0, 5.0, 7.0, 12.0]),
            wr: buffer(&[0.0, 2.0, 4.0, 6.0, 15.0]),
            te: buffer(&[1.0, 3.0, 4.0, 7.0]),
        },
        yac_red_zone: PositionBuckets::uniform(buffer(&[0.0, 1.0, 2.0, 4.0])),
    }
}

pub fn bundle_spec() -> BundleSpec {
    BundleSpec {
        playcall: playcall(0.55, 0.35, 0.06, 0.04),
        completion: completion(0.64),
        field_goal: field_goal(0.84),
        samples: sample_bank(),
        clock: Vec::new(),
        config: Default::default(),
    }
}

pub fn test_bundle() -> ModelBundle {
    build(bundle_spec())
}

pub fn build(spec: BundleSpec) -> ModelBundle {
    ModelBundle::from_spec(spec).expect("fixture bundle is valid")
}

/// Bundle whose every rush gains exactly `yards`.
pub fn fixed_rush_bundle(yards: f64) -> BundleSpec {
    let mut spec = bundle_spec();
    spec.playcall = playcall(0.0, 1.0, 0.0, 0.0);
    spec.samples.rush_open = buffer(&[yards]);
    spec.samples.rush_red_zone = buffer(&[yards]);
    spec
}

// =============================================================================
// Team Helpers
// =============================================================================

fn player(id: String, position: Position) -> PlayerRecord {
    PlayerRecord::new(id, position)
}

/// QB, two RBs, three WRs, a TE and a K with plausible shares.
pub fn test_team(abbr: &str) -> TeamSnapshot {
    let mut qb = player(format!("{abbr}-QB1"), Position::Qb);
    qb.starting_qb = true;
    qb.pass_attempts = 520.0;
    qb.cpoe = Some(1.5);
    qb.scramble_rate = Some(0.04);
    qb.is_mobile = Some(false);
    qb.carry_pct = Some(0.05);
    qb.carry_share = Some(0.05);

    let mut backup = player(format!("{abbr}-QB2"), Position::Qb);
    backup.pass_attempts = 40.0;

    let mut rb1 = player(format!("{abbr}-RB1"), Position::Rb);
    rb1.carry_pct = Some(0.6);
    rb1.carry_share = Some(0.6);
    rb1.red_zone_carry_share = Some(0.7);
    rb1.goal_line_carry_share = Some(0.8);
    rb1.target_pct = Some(0.1);
    rb1.target_share = Some(0.1);
    rb1.relative_ypc = Some(1.05);

    let mut rb2 = player(format!("{abbr}-RB2"), Position::Rb);
    rb2.carry_pct = Some(0.3);
    rb2.carry_share = Some(0.3);
    rb2.target_pct = Some(0.05);
    rb2.target_share = Some(0.05);

    let mut players = vec![qb, backup, rb1, rb2];
    for (i, share) in [0.26, 0.2, 0.14].iter().enumerate() {
        let mut wr = player(format!("{abbr}-WR{}", i + 1), Position::Wr);
        wr.target_pct = Some(*share);
        wr.target_share = Some(*share);
        wr.relative_air_yards = Some(1.0 + 0.05 * i as f64);
        wr.receiver_cpoe = Some(1.0 - i as f64);
        players.push(wr);
    }

    let mut te = player(format!("{abbr}-TE1"), Position::Te);
    te.target_pct = Some(0.15);
    te.target_share = Some(0.15);
    te.relative_yac = Some(1.1);
    players.push(te);

    let mut k = player(format!("{abbr}-K"), Position::K);
    k.starting_k = true;
    k.kick_attempts = 35.0;
    k.fgoe = Some(2.0);
    players.push(k);

    TeamSnapshot { abbr: abbr.to_string(), splits: TeamSplits::default(), players }
}

pub fn test_matchup() -> Matchup {
    Matchup::new(test_team("KC"), test_team("BUF"))
}

//! Per-team player pools
//!
//! Built once per game from a team snapshot. Starters are fixed for the
//! whole game; carriers and targets are weighted pools sampled per play.

use std::borrow::Cow;

use log::warn;
use rand::Rng;

use super::config::EngineConfig;
use super::selection::WeightedPool;
use crate::models::{PlayerRecord, Position};

/// Field zone of the line of scrimmage, by distance to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldZone {
    Open,
    RedZone,
    GoalLine,
}

impl FieldZone {
    pub fn of(yard_line: f64, config: &EngineConfig) -> Self {
        if yard_line <= config.goal_line {
            FieldZone::GoalLine
        } else if yard_line <= config.red_zone {
            FieldZone::RedZone
        } else {
            FieldZone::Open
        }
    }

    pub fn is_red_zone(self) -> bool {
        !matches!(self, FieldZone::Open)
    }
}

/// Player resolved for a play, or the team's synthetic stand-in.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor<'a> {
    pub id: Cow<'a, str>,
    pub record: Option<&'a PlayerRecord>,
}

impl<'a> Actor<'a> {
    fn player(record: &'a PlayerRecord) -> Self {
        Self { id: Cow::Borrowed(record.id.as_str()), record: Some(record) }
    }

    fn fallback(id: &str) -> Self {
        Self { id: Cow::Owned(id.to_string()), record: None }
    }

    pub fn position(&self) -> Position {
        self.record.map_or(Position::Other, |p| p.position)
    }
}

#[derive(Debug, Clone)]
pub struct PlayerPool<'a> {
    players: &'a [PlayerRecord],
    quarterback: Option<usize>,
    kicker: Option<usize>,
    carriers: WeightedPool<usize>,
    red_zone_carriers: WeightedPool<usize>,
    goal_line_carriers: WeightedPool<usize>,
    targets: WeightedPool<usize>,
    fallback_qb: String,
    fallback_k: String,
    fallback_carrier: String,
    fallback_target: String,
}

fn share(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Explicit starter if exactly one is flagged, else most attempts
/// (first listed wins ties).
fn pick_starter(
    players: &[PlayerRecord],
    position: Position,
    flagged: impl Fn(&PlayerRecord) -> bool,
    attempts: impl Fn(&PlayerRecord) -> f64,
) -> Option<usize> {
    let candidates: Vec<usize> =
        (0..players.len()).filter(|&i| players[i].position == position).collect();
    let starters: Vec<usize> = candidates.iter().copied().filter(|&i| flagged(&players[i])).collect();
    if starters.len() == 1 {
        return Some(starters[0]);
    }
    let mut best: Option<(usize, f64)> = None;
    for i in candidates {
        let n = attempts(&players[i]);
        let n = if n.is_finite() { n } else { 0.0 };
        match best {
            Some((_, top)) if n <= top => {}
            _ => best = Some((i, n)),
        }
    }
    best.map(|(i, _)| i)
}

fn pool(players: &[PlayerRecord], eligible: &[usize], weight: impl Fn(&PlayerRecord) -> f64) -> WeightedPool<usize> {
    let weights: Vec<f64> = eligible.iter().map(|&i| weight(&players[i])).collect();
    WeightedPool::new(eligible.to_vec(), &weights)
}

impl<'a> PlayerPool<'a> {
    pub fn new(team: &str, players: &'a [PlayerRecord]) -> Self {
        let quarterback = pick_starter(players, Position::Qb, |p| p.starting_qb, |p| p.pass_attempts);
        let kicker = pick_starter(players, Position::K, |p| p.starting_k, |p| p.kick_attempts);

        let rushers: Vec<usize> = (0..players.len()).filter(|&i| players[i].is_carrier()).collect();
        let carriers = pool(players, &rushers, |p| share(p.carry_share));
        let red_zone_carriers =
            pool(players, &rushers, |p| share(p.red_zone_carry_share.or(p.carry_share)));
        let goal_line_carriers = pool(players, &rushers, |p| {
            share(p.goal_line_carry_share.or(p.red_zone_carry_share).or(p.carry_share))
        });

        let receivers: Vec<usize> = (0..players.len()).filter(|&i| players[i].is_target()).collect();
        let targets = pool(players, &receivers, |p| share(p.target_share));

        if quarterback.is_none() {
            warn!("{team}: no quarterback on roster, passes credited to QB_{team}");
        }
        if kicker.is_none() {
            warn!("{team}: no kicker on roster, kicks credited to K_{team}");
        }
        if carriers.is_empty() {
            warn!("{team}: no eligible ball carriers");
        }
        if targets.is_empty() {
            warn!("{team}: no eligible pass targets");
        }

        Self {
            players,
            quarterback,
            kicker,
            carriers,
            red_zone_carriers,
            goal_line_carriers,
            targets,
            fallback_qb: format!("QB_{team}"),
            fallback_k: format!("K_{team}"),
            fallback_carrier: format!("RB_{team}"),
            fallback_target: format!("WR_{team}"),
        }
    }

    fn actor(&self, index: Option<usize>, fallback: &str) -> Actor<'a> {
        let players: &'a [PlayerRecord] = self.players;
        match index {
            Some(i) => Actor::player(&players[i]),
            None => Actor::fallback(fallback),
        }
    }

    pub fn quarterback(&self) -> Actor<'a> {
        self.actor(self.quarterback, &self.fallback_qb)
    }

    pub fn kicker(&self) -> Actor<'a> {
        self.actor(self.kicker, &self.fallback_k)
    }

    pub fn choose_carrier<R: Rng + ?Sized>(&self, rng: &mut R, zone: FieldZone) -> Actor<'a> {
        let pool = match zone {
            FieldZone::Open => &self.carriers,
            FieldZone::RedZone => &self.red_zone_carriers,
            FieldZone::GoalLine => &self.goal_line_carriers,
        };
        self.actor(pool.choose(rng).copied(), &self.fallback_carrier)
    }

    pub fn choose_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Actor<'a> {
        self.actor(self.targets.choose(rng).copied(), &self.fallback_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn qb(id: &str, starter: bool, attempts: f64) -> PlayerRecord {
        PlayerRecord { starting_qb: starter, pass_attempts: attempts, ..PlayerRecord::new(id, Position::Qb) }
    }

    #[test]
    fn test_unique_flag_beats_attempts() {
        let players = vec![qb("a", false, 500.0), qb("b", true, 20.0)];
        let pool = PlayerPool::new("KC", &players);
        assert_eq!(pool.quarterback().id, "b");
    }

    #[test]
    fn test_ambiguous_flags_fall_back_to_attempts() {
        let players = vec![qb("a", true, 100.0), qb("b", true, 300.0), qb("c", false, 300.0)];
        let pool = PlayerPool::new("KC", &players);
        assert_eq!(pool.quarterback().id, "b");
    }

    #[test]
    fn test_missing_positions_use_team_ids() {
        let players: Vec<PlayerRecord> = Vec::new();
        let pool = PlayerPool::new("DET", &players);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(pool.quarterback().id, "QB_DET");
        assert_eq!(pool.kicker().id, "K_DET");
        assert_eq!(pool.choose_carrier(&mut rng, FieldZone::Open).id, "RB_DET");
        assert_eq!(pool.choose_target(&mut rng).id, "WR_DET");
        assert!(pool.quarterback().record.is_none());
    }

    #[test]
    fn test_goal_line_weights_override_standard() {
        let mut rb1 = PlayerRecord::new("rb1", Position::Rb);
        rb1.carry_share = Some(0.9);
        rb1.goal_line_carry_share = Some(0.0);
        let mut rb2 = PlayerRecord::new("rb2", Position::Rb);
        rb2.carry_share = Some(0.1);
        rb2.goal_line_carry_share = Some(1.0);
        let players = vec![rb1, rb2];
        let pool = PlayerPool::new("SF", &players);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(pool.choose_carrier(&mut rng, FieldZone::GoalLine).id, "rb2");
        }
        // Red zone has no override and inherits the standard shares.
        let rb1_rz = (0..2000)
            .filter(|_| pool.choose_carrier(&mut rng, FieldZone::RedZone).id == "rb1")
            .count();
        assert!(rb1_rz > 1600);
    }

    #[test]
    fn test_field_zones() {
        let cfg = EngineConfig::default();
        assert_eq!(FieldZone::of(3.0, &cfg), FieldZone::GoalLine);
        assert_eq!(FieldZone::of(3.5, &cfg), FieldZone::RedZone);
        assert_eq!(FieldZone::of(20.0, &cfg), FieldZone::RedZone);
        assert_eq!(FieldZone::of(20.5, &cfg), FieldZone::Open);
    }
}

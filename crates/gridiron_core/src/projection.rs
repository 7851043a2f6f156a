//! Projection runner
//!
//! Runs many independent seeded games of one matchup and summarizes every
//! ledger key (players and team defenses) into mean and percentile points.
//!
//! Trial `i` uses seed `base_seed + i`. Results are collected in trial order,
//! so the summary does not depend on how rayon schedules the work.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{GameOutcome, GameState, ModelBundle};
use crate::error::Result;
use crate::models::{Matchup, ScoringRules};

/// 프로젝션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub trials: u32,
    pub base_seed: u64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self { trials: 1000, base_seed: 0 }
    }
}

impl ProjectionConfig {
    pub fn new(trials: u32, base_seed: u64) -> Self {
        Self { trials, base_seed }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn seed(&self, trial: u32) -> u64 {
        self.base_seed.wrapping_add(u64::from(trial))
    }
}

/// Points distribution for one ledger key across all trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProjection {
    pub id: String,
    pub mean: f64,
    pub std_dev: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl PlayerProjection {
    /// Trials where the key never appeared count as zero points.
    fn from_points(id: &str, mut points: Vec<f64>) -> Self {
        let n = points.len().max(1) as f64;
        let mean = points.iter().sum::<f64>() / n;
        let variance = points.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
        points.sort_by(|a, b| a.total_cmp(b));
        Self {
            id: id.to_string(),
            mean,
            std_dev: variance.sqrt(),
            p10: percentile(&points, 0.10),
            p25: percentile(&points, 0.25),
            p50: percentile(&points, 0.50),
            p75: percentile(&points, 0.75),
            p90: percentile(&points, 0.90),
        }
    }
}

/// Linear interpolation between closest ranks of an ascending slice.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub home: String,
    pub away: String,
    pub trials: u32,
    pub home_win_rate: f64,
    pub away_win_rate: f64,
    pub tie_rate: f64,
    pub overtime_rate: f64,
    pub mean_home_score: f64,
    pub mean_away_score: f64,
    pub mean_snaps: f64,
    /// Sorted by id.
    pub players: Vec<PlayerProjection>,
}

impl ProjectionSummary {
    pub fn player(&self, id: &str) -> Option<&PlayerProjection> {
        self.players.iter().find(|p| p.id == id)
    }

    fn aggregate(matchup: &Matchup, outcomes: &[GameOutcome]) -> Self {
        let n = outcomes.len().max(1) as f64;
        let rate = |hit: fn(&GameOutcome) -> bool| {
            outcomes.iter().filter(|o| hit(o)).count() as f64 / n
        };
        let mean = |value: fn(&GameOutcome) -> f64| outcomes.iter().map(value).sum::<f64>() / n;

        let ids: BTreeSet<&str> =
            outcomes.iter().flat_map(|o| o.ledger.iter().map(|(id, _)| id)).collect();
        let players = ids
            .into_iter()
            .map(|id| {
                let points = outcomes.iter().map(|o| o.ledger.points(id)).collect();
                PlayerProjection::from_points(id, points)
            })
            .collect();

        Self {
            home: matchup.home.abbr.clone(),
            away: matchup.away.abbr.clone(),
            trials: outcomes.len() as u32,
            home_win_rate: rate(|o| o.home_score > o.away_score),
            away_win_rate: rate(|o| o.away_score > o.home_score),
            tie_rate: rate(|o| o.home_score == o.away_score),
            overtime_rate: rate(|o| o.overtime),
            mean_home_score: mean(|o| f64::from(o.home_score)),
            mean_away_score: mean(|o| f64::from(o.away_score)),
            mean_snaps: mean(|o| f64::from(o.snaps)),
            players,
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Play `config.trials` games in parallel and summarize their ledgers.
///
/// The first failing trial (in trial order) aborts the run.
pub fn run_trials(
    bundle: &ModelBundle,
    matchup: &Matchup,
    rules: &ScoringRules,
    config: &ProjectionConfig,
) -> Result<ProjectionSummary> {
    matchup.validate()?;
    if config.trials == 0 {
        warn!(home = %matchup.home.abbr, away = %matchup.away.abbr, "projection requested with zero trials");
    }
    info!(
        home = %matchup.home.abbr,
        away = %matchup.away.abbr,
        trials = config.trials,
        base_seed = config.base_seed,
        "running projection"
    );

    let outcomes = (0..config.trials)
        .into_par_iter()
        .map(|trial| GameState::new(bundle, matchup, rules, config.seed(trial))?.play_game())
        .collect::<Result<Vec<_>>>()?;

    let summary = ProjectionSummary::aggregate(matchup, &outcomes);
    debug!(
        home_win_rate = summary.home_win_rate,
        mean_home_score = summary.mean_home_score,
        mean_away_score = summary.mean_away_score,
        players = summary.players.len(),
        "projection complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{test_bundle, test_matchup};

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&sorted, 0.0), 0.0);
        assert_eq!(percentile(&sorted, 0.5), 20.0);
        assert_eq!(percentile(&sorted, 1.0), 40.0);
        assert!((percentile(&sorted, 0.10) - 4.0).abs() < 1e-9);
        assert_eq!(percentile(&[], 0.5), 0.0);
        assert_eq!(percentile(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn test_projection_from_points() {
        let p = PlayerProjection::from_points("wr", vec![4.0, 0.0, 2.0, 6.0]);
        assert!((p.mean - 3.0).abs() < 1e-9);
        assert!((p.std_dev - 5.0f64.sqrt()).abs() < 1e-9);
        assert!(p.p10 <= p.p25 && p.p25 <= p.p50 && p.p50 <= p.p75 && p.p75 <= p.p90);
        assert!((p.p50 - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_trials_summary() {
        let bundle = test_bundle();
        let matchup = test_matchup();
        let rules = ScoringRules::default();

        let summary = run_trials(&bundle, &matchup, &rules, &ProjectionConfig::new(24, 7)).unwrap();

        assert_eq!(summary.trials, 24);
        let total = summary.home_win_rate + summary.away_win_rate + summary.tie_rate;
        assert!((total - 1.0).abs() < 1e-9);
        assert!(summary.mean_home_score + summary.mean_away_score > 0.0);
        assert!(summary.player("KC-QB1").is_some());
        assert!(summary.player("BUF").is_some());
        assert!(summary.players.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_summary_independent_of_thread_count() {
        let bundle = test_bundle();
        let matchup = test_matchup();
        let rules = ScoringRules::default();
        let config = ProjectionConfig::new(16, 99);

        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(|| run_trials(&bundle, &matchup, &rules, &config))
            .unwrap();
        let parallel = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap()
            .install(|| run_trials(&bundle, &matchup, &rules, &config))
            .unwrap();

        assert_eq!(single, parallel);
    }

    #[test]
    fn test_trial_seeds_match_single_games() {
        let bundle = test_bundle();
        let matchup = test_matchup();
        let rules = ScoringRules::default();

        let summary = run_trials(&bundle, &matchup, &rules, &ProjectionConfig::new(1, 42)).unwrap();
        let game = GameState::new(&bundle, &matchup, &rules, 42).unwrap().play_game().unwrap();

        assert_eq!(summary.mean_home_score, f64::from(game.home_score));
        let qb = summary.player("KC-QB1").unwrap();
        assert_eq!(qb.mean, game.ledger.points("KC-QB1"));
    }

    #[test]
    fn test_zero_trials_gives_empty_summary() {
        let bundle = test_bundle();
        let matchup = test_matchup();
        let rules = ScoringRules::default();

        let summary = run_trials(&bundle, &matchup, &rules, &ProjectionConfig::new(0, 0)).unwrap();

        assert_eq!(summary.trials, 0);
        assert!(summary.players.is_empty());
    }

    #[test]
    fn test_config_from_yaml_defaults() {
        let config = ProjectionConfig::from_yaml("trials: 50").unwrap();
        assert_eq!(config.trials, 50);
        assert_eq!(config.base_seed, 0);
    }
}

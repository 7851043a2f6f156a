//! Fantasy ledger
//!
//! Points per player id (and per team abbreviation for defenses), plus the
//! raw box-score counts the points were derived from. Keys are created
//! lazily; ordered maps keep serialized output byte-stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ScoringRules;

/// 선수별 박스스코어
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub pass_yards: f64,
    pub pass_tds: u32,
    pub interceptions: u32,
    pub sacks_taken: u32,
    pub carries: u32,
    pub rush_yards: f64,
    pub rush_tds: u32,
    pub receptions: u32,
    pub rec_yards: f64,
    pub rec_tds: u32,
    pub fumbles_lost: u32,
    pub fg_made: u32,
    pub pat_made: u32,
    // team defense
    pub def_sacks: u32,
    pub def_ints: u32,
    pub def_fumble_recs: u32,
    pub def_safeties: u32,
    pub def_tds: u32,
    pub points_allowed: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FantasyLedger {
    points: BTreeMap<String, f64>,
    stats: BTreeMap<String, StatLine>,
}

impl FantasyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points to `id`. Non-finite amounts are dropped so every stored
    /// value stays finite.
    pub fn award(&mut self, id: &str, amount: f64) {
        let entry = self.points.entry(id.to_string()).or_insert(0.0);
        if amount.is_finite() {
            *entry += amount;
        }
    }

    fn line(&mut self, id: &str) -> &mut StatLine {
        self.stats.entry(id.to_string()).or_default()
    }

    pub fn points(&self, id: &str) -> f64 {
        self.points.get(id).copied().unwrap_or(0.0)
    }

    pub fn stats(&self, id: &str) -> Option<&StatLine> {
        self.stats.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.points.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn box_score(&self) -> &BTreeMap<String, StatLine> {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.points.values().all(|v| v.is_finite())
    }

    // ========================================================================
    // Play credits
    // ========================================================================

    pub fn credit_rush(&mut self, rules: &ScoringRules, rusher: &str, yards: f64, touchdown: bool) {
        let line = self.line(rusher);
        line.carries += 1;
        line.rush_yards += yards;
        if touchdown {
            line.rush_tds += 1;
        }
        let td = if touchdown { rules.rush_td } else { 0.0 };
        self.award(rusher, rules.rush_yard * yards + td);
    }

    pub fn credit_completion(
        &mut self,
        rules: &ScoringRules,
        passer: &str,
        receiver: &str,
        yards: f64,
        touchdown: bool,
    ) {
        {
            let line = self.line(passer);
            line.pass_yards += yards;
            if touchdown {
                line.pass_tds += 1;
            }
        }
        {
            let line = self.line(receiver);
            line.receptions += 1;
            line.rec_yards += yards;
            if touchdown {
                line.rec_tds += 1;
            }
        }
        let (pass_td, rec_td) = if touchdown { (rules.pass_td, rules.rec_td) } else { (0.0, 0.0) };
        self.award(passer, rules.pass_yard * yards + pass_td);
        self.award(receiver, rules.reception + rules.rec_yard * yards + rec_td);
    }

    pub fn credit_interception(&mut self, rules: &ScoringRules, passer: &str, defense: &str) {
        self.line(passer).interceptions += 1;
        self.line(defense).def_ints += 1;
        self.award(passer, rules.intercept);
        self.award(defense, rules.def_int);
    }

    pub fn credit_sack(&mut self, rules: &ScoringRules, passer: &str, defense: &str) {
        self.line(passer).sacks_taken += 1;
        self.line(defense).def_sacks += 1;
        self.award(defense, rules.def_sack);
        self.award(passer, rules.sack);
    }

    pub fn credit_fumble(&mut self, rules: &ScoringRules, fumbler: &str, recovering: &str) {
        self.line(fumbler).fumbles_lost += 1;
        self.line(recovering).def_fumble_recs += 1;
        self.award(fumbler, rules.fumble_lost);
        self.award(recovering, rules.def_fumble_rec);
    }

    pub fn credit_defensive_td(&mut self, rules: &ScoringRules, defense: &str) {
        self.line(defense).def_tds += 1;
        self.award(defense, rules.def_td);
    }

    pub fn credit_safety(&mut self, rules: &ScoringRules, defense: &str) {
        self.line(defense).def_safeties += 1;
        self.award(defense, rules.def_safety);
    }

    pub fn credit_field_goal(&mut self, rules: &ScoringRules, kicker: &str, distance: f64) {
        self.line(kicker).fg_made += 1;
        self.award(kicker, rules.field_goal_points(distance));
    }

    pub fn credit_extra_point(&mut self, rules: &ScoringRules, kicker: &str) {
        self.line(kicker).pat_made += 1;
        self.award(kicker, rules.pat_made);
    }

    pub fn credit_points_allowed(&mut self, rules: &ScoringRules, defense: &str, allowed: u32) {
        self.line(defense).points_allowed = Some(allowed);
        self.award(defense, rules.points_allowed(allowed));
    }
}

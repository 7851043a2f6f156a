//! Pre-drawn yardage sample buffers
//!
//! Each buffer stands in for a continuous empirical distribution and is
//! sampled by uniform index in O(1). Optional buckets fall back to their
//! parent bucket when empty.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Position;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleBuffer {
    values: Vec<f64>,
}

impl SampleBuffer {
    /// Non-finite values are dropped.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values: values.into_iter().filter(|v| v.is_finite()).collect() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Uniform draw; an empty buffer yields a neutral 0 without consuming randomness.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values[rng.gen_range(0..self.values.len())]
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        }
    }

    fn sanitize(&mut self) {
        self.values.retain(|v| v.is_finite());
    }
}

impl From<Vec<f64>> for SampleBuffer {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Buffers split by receiver position; `all` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionBuckets {
    pub all: SampleBuffer,
    #[serde(default)]
    pub rb: SampleBuffer,
    #[serde(default)]
    pub wr: SampleBuffer,
    #[serde(default)]
    pub te: SampleBuffer,
}

impl PositionBuckets {
    pub fn uniform(all: SampleBuffer) -> Self {
        Self { all, ..Default::default() }
    }

    pub fn for_position(&self, position: Position) -> &SampleBuffer {
        let bucket = match position {
            Position::Rb => &self.rb,
            Position::Wr => &self.wr,
            Position::Te => &self.te,
            _ => &self.all,
        };
        if bucket.is_empty() {
            &self.all
        } else {
            bucket
        }
    }

    fn sanitize(&mut self) {
        for b in [&mut self.all, &mut self.rb, &mut self.wr, &mut self.te] {
            b.sanitize();
        }
    }
}

/// Every yardage distribution the engine draws from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleBank {
    pub rush_open: SampleBuffer,
    #[serde(default)]
    pub rush_red_zone: SampleBuffer,

    pub scramble: SampleBuffer,
    #[serde(default)]
    pub scramble_mobile: SampleBuffer,
    #[serde(default)]
    pub scramble_pocket: SampleBuffer,

    pub int_return: SampleBuffer,

    pub air_yards: PositionBuckets,
    pub yac_open: PositionBuckets,
    #[serde(default)]
    pub yac_red_zone: PositionBuckets,
}

fn or_fallback<'a>(preferred: &'a SampleBuffer, fallback: &'a SampleBuffer) -> &'a SampleBuffer {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

impl SampleBank {
    /// Drop non-finite values and check that required buffers are populated.
    pub fn validate(&mut self) -> Result<(), String> {
        for b in [
            &mut self.rush_open,
            &mut self.rush_red_zone,
            &mut self.scramble,
            &mut self.scramble_mobile,
            &mut self.scramble_pocket,
            &mut self.int_return,
        ] {
            b.sanitize();
        }
        for b in [&mut self.air_yards, &mut self.yac_open, &mut self.yac_red_zone] {
            b.sanitize();
        }

        let required = [
            ("rush_open", &self.rush_open),
            ("scramble", &self.scramble),
            ("int_return", &self.int_return),
            ("air_yards.all", &self.air_yards.all),
            ("yac_open.all", &self.yac_open.all),
        ];
        match required.iter().find(|(_, b)| b.is_empty()) {
            Some((name, _)) => Err(format!("sample buffer '{name}' is empty")),
            None => Ok(()),
        }
    }

    pub fn rush(&self, red_zone: bool) -> &SampleBuffer {
        if red_zone {
            or_fallback(&self.rush_red_zone, &self.rush_open)
        } else {
            &self.rush_open
        }
    }

    /// `None` mobility (unknown) uses the pooled buffer.
    pub fn scramble(&self, is_mobile: Option<bool>) -> &SampleBuffer {
        match is_mobile {
            Some(true) => or_fallback(&self.scramble_mobile, &self.scramble),
            Some(false) => or_fallback(&self.scramble_pocket, &self.scramble),
            None => &self.scramble,
        }
    }

    pub fn air_yards(&self, position: Position) -> &SampleBuffer {
        self.air_yards.for_position(position)
    }

    pub fn yac(&self, position: Position, red_zone: bool) -> &SampleBuffer {
        if red_zone && !self.yac_red_zone.all.is_empty() {
            self.yac_red_zone.for_position(position)
        } else {
            self.yac_open.for_position(position)
        }
    }

    pub fn int_return(&self) -> &SampleBuffer {
        &self.int_return
    }
}

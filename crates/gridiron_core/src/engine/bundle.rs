//! Model bundle
//!
//! Every collaborator a trial needs, validated once and then shared
//! read-only (`&ModelBundle`) across any number of trials and threads.

use serde::{Deserialize, Serialize};

use super::clock::{ClockRow, ClockTable};
use super::config::EngineConfig;
use super::providers::{Classifier, ClassifierSpec, OutcomeModel, PlayCallModel};
use super::samples::SampleBank;
use crate::error::{Result, SimError};

/// Serialized bundle contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleSpec {
    pub playcall: ClassifierSpec,
    pub completion: ClassifierSpec,
    pub field_goal: ClassifierSpec,
    pub samples: SampleBank,
    #[serde(default)]
    pub clock: Vec<ClockRow>,
    #[serde(default)]
    pub config: EngineConfig,
}

impl BundleSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug)]
pub struct ModelBundle {
    pub playcall: PlayCallModel,
    pub completion: OutcomeModel,
    pub field_goal: OutcomeModel,
    pub samples: SampleBank,
    pub clock: ClockTable,
    pub config: EngineConfig,
}

impl ModelBundle {
    pub fn new(
        playcall: Box<dyn Classifier>,
        completion: Box<dyn Classifier>,
        field_goal: Box<dyn Classifier>,
        mut samples: SampleBank,
        clock: ClockTable,
        config: EngineConfig,
    ) -> Result<Self> {
        samples.validate().map_err(SimError::InvalidBundle)?;
        config.validate().map_err(SimError::InvalidBundle)?;
        Ok(Self {
            playcall: PlayCallModel::new(playcall)?,
            completion: OutcomeModel::completion(completion)?,
            field_goal: OutcomeModel::field_goal(field_goal)?,
            samples,
            clock,
            config,
        })
    }

    pub fn from_spec(spec: BundleSpec) -> Result<Self> {
        for (name, model) in [
            ("playcall", &spec.playcall),
            ("completion", &spec.completion),
            ("field_goal", &spec.field_goal),
        ] {
            model
                .validate()
                .map_err(|e| SimError::InvalidBundle(format!("{name}: {e}")))?;
        }
        let clock = ClockTable::from_rows(&spec.clock);
        if clock.is_empty() {
            log::info!("bundle has no clock table, every snap uses the fallback runoff");
        }
        Self::new(
            spec.playcall.into_boxed(),
            spec.completion.into_boxed(),
            spec.field_goal.into_boxed(),
            spec.samples,
            clock,
            spec.config,
        )
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_spec(BundleSpec::from_json(json)?)
    }
}

//! Classifier collaborators
//!
//! The engine only sees the [`Classifier`] trait. Two serializable
//! implementations ship with the crate: a fitted logistic model and a fixed
//! prior. Typed wrappers resolve class labels to indices once at bundle
//! construction so no per-play code depends on label order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, SimError};
use crate::models::PlayType;

pub const PLAYCALL_FEATURES: usize = 9;
pub const COMPLETION_FEATURES: usize = 6;
pub const FIELD_GOAL_FEATURES: usize = 6;

/// Feature vector → class probabilities.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Class labels in output order.
    fn classes(&self) -> &[String];

    fn n_features(&self) -> usize;

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

fn check_features(features: &[f64], expected: usize) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::FeatureCount { expected, found: features.len() });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(InferenceError::NonFinite { index });
    }
    Ok(())
}

// ============================================================================
// Logistic model
// ============================================================================

/// Fitted (multinomial) logistic regression with optional standardization.
///
/// One coefficient row with two classes is the binary form: the row scores
/// the second class. Otherwise there is one row per class and a softmax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub classes: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub means: Option<Vec<f64>>,
    #[serde(default)]
    pub scales: Option<Vec<f64>>,
}

impl LogisticModel {
    fn is_binary(&self) -> bool {
        self.coefficients.len() == 1 && self.classes.len() == 2
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err("logistic model needs at least two classes".into());
        }
        let rows = if self.is_binary() { 1 } else { self.classes.len() };
        if self.coefficients.len() != rows || self.intercepts.len() != rows {
            return Err(format!(
                "expected {rows} coefficient rows and intercepts, found {} and {}",
                self.coefficients.len(),
                self.intercepts.len()
            ));
        }
        let width = self.coefficients[0].len();
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err("coefficient rows have different widths".into());
        }
        for (name, column) in [("means", &self.means), ("scales", &self.scales)] {
            if let Some(values) = column {
                if values.len() != width {
                    return Err(format!("{name} has {} entries, expected {width}", values.len()));
                }
            }
        }
        if self.scales.as_ref().is_some_and(|s| s.iter().any(|v| *v == 0.0)) {
            return Err("scales contain zero".into());
        }
        let all_finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("non-finite coefficient".into());
        }
        Ok(())
    }

    fn standardize(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let mean = self.means.as_ref().map_or(0.0, |m| m[i]);
                let scale = self.scales.as_ref().map_or(1.0, |s| s[i]);
                (x - mean) / scale
            })
            .collect()
    }
}

fn dot(row: &[f64], x: &[f64]) -> f64 {
    row.iter().zip(x).map(|(w, v)| w * v).sum()
}

impl Classifier for LogisticModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_features(features, self.n_features())?;
        let x = self.standardize(features);

        let probs = if self.is_binary() {
            let z = dot(&self.coefficients[0], &x) + self.intercepts[0];
            let p = 1.0 / (1.0 + (-z).exp());
            vec![1.0 - p, p]
        } else {
            let logits: Vec<f64> = self
                .coefficients
                .iter()
                .zip(&self.intercepts)
                .map(|(row, b)| dot(row, &x) + b)
                .collect();
            let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
            let total: f64 = exps.iter().sum();
            exps.into_iter().map(|e| e / total).collect()
        };

        if probs.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::InvalidOutput("non-finite probability".into()));
        }
        Ok(probs)
    }
}

// ============================================================================
// Fixed prior
// ============================================================================

/// State-independent class probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedProbabilities {
    pub classes: Vec<String>,
    pub probabilities: Vec<f64>,
    pub n_features: usize,
}

impl FixedProbabilities {
    pub fn new(classes: &[&str], probabilities: &[f64], n_features: usize) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            probabilities: probabilities.to_vec(),
            n_features,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.classes.len() != self.probabilities.len() {
            return Err(format!(
                "{} classes but {} probabilities",
                self.classes.len(),
                self.probabilities.len()
            ));
        }
        if self.probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err("probabilities must be finite and non-negative".into());
        }
        if self.probabilities.iter().sum::<f64>() <= 0.0 {
            return Err("probabilities sum to zero".into());
        }
        Ok(())
    }
}

impl Classifier for FixedProbabilities {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_features(features, self.n_features)?;
        Ok(self.probabilities.clone())
    }
}

/// Serialized form of any bundled classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    Logistic(LogisticModel),
    Fixed(FixedProbabilities),
}

impl ClassifierSpec {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ClassifierSpec::Logistic(m) => m.validate(),
            ClassifierSpec::Fixed(m) => m.validate(),
        }
    }

    pub fn into_boxed(self) -> Box<dyn Classifier> {
        match self {
            ClassifierSpec::Logistic(m) => Box::new(m),
            ClassifierSpec::Fixed(m) => Box::new(m),
        }
    }
}

// ============================================================================
// Typed wrappers
// ============================================================================

fn check_width(name: &str, inner: &dyn Classifier, expected: usize) -> crate::Result<()> {
    if inner.n_features() != expected {
        return Err(SimError::InvalidBundle(format!(
            "{name} model takes {} features, engine supplies {expected}",
            inner.n_features()
        )));
    }
    Ok(())
}

/// Play-call classifier with its label → [`PlayType`] table.
#[derive(Debug)]
pub struct PlayCallModel {
    inner: Box<dyn Classifier>,
    /// Output column for each play type, in [`PlayType::ALL`] order.
    columns: [usize; 4],
}

impl PlayCallModel {
    pub fn new(inner: Box<dyn Classifier>) -> crate::Result<Self> {
        check_width("playcall", inner.as_ref(), PLAYCALL_FEATURES)?;
        let mut columns = [usize::MAX; 4];
        for (i, label) in inner.classes().iter().enumerate() {
            match PlayType::from_label(label) {
                Some(play) => columns[play.index()] = i,
                None => {
                    return Err(SimError::InvalidBundle(format!(
                        "playcall model has unknown class '{label}'"
                    )))
                }
            }
        }
        if let Some(missing) = PlayType::ALL.iter().find(|p| columns[p.index()] == usize::MAX) {
            return Err(SimError::InvalidBundle(format!(
                "playcall model has no '{}' class",
                missing.label()
            )));
        }
        Ok(Self { inner, columns })
    }

    /// Probabilities in [`PlayType::ALL`] order.
    pub fn probabilities(&self, features: &[f64]) -> Result<[f64; 4], InferenceError> {
        let raw = self.inner.predict_proba(features)?;
        if raw.len() != self.inner.classes().len() {
            return Err(InferenceError::InvalidOutput(format!(
                "{} probabilities for {} classes",
                raw.len(),
                self.inner.classes().len()
            )));
        }
        Ok(self.columns.map(|c| raw[c]))
    }
}

/// Binary-outcome classifier (completion, field goal) with the column of
/// the success class resolved up front.
#[derive(Debug)]
pub struct OutcomeModel {
    inner: Box<dyn Classifier>,
    success: usize,
}

impl OutcomeModel {
    fn with_labels(
        name: &str,
        inner: Box<dyn Classifier>,
        width: usize,
        success_labels: &[&str],
    ) -> crate::Result<Self> {
        check_width(name, inner.as_ref(), width)?;
        let success = inner
            .classes()
            .iter()
            .position(|c| success_labels.contains(&c.trim().to_ascii_lowercase().as_str()))
            .ok_or_else(|| {
                SimError::InvalidBundle(format!(
                    "{name} model has none of the classes {success_labels:?}"
                ))
            })?;
        Ok(Self { inner, success })
    }

    pub fn completion(inner: Box<dyn Classifier>) -> crate::Result<Self> {
        Self::with_labels("completion", inner, COMPLETION_FEATURES, &["complete", "1", "1.0", "true"])
    }

    pub fn field_goal(inner: Box<dyn Classifier>) -> crate::Result<Self> {
        Self::with_labels("field_goal", inner, FIELD_GOAL_FEATURES, &["made", "good", "1", "1.0", "true"])
    }

    pub fn success_column(&self) -> usize {
        self.success
    }

    /// Full probability vector in the classifier's own order.
    pub fn probabilities(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let raw = self.inner.predict_proba(features)?;
        if raw.len() != self.inner.classes().len() {
            return Err(InferenceError::InvalidOutput(format!(
                "{} probabilities for {} classes",
                raw.len(),
                self.inner.classes().len()
            )));
        }
        Ok(raw)
    }

    pub fn success_probability(&self, features: &[f64]) -> Result<f64, InferenceError> {
        Ok(self.probabilities(features)?[self.success])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(coef: Vec<f64>, intercept: f64) -> LogisticModel {
        LogisticModel {
            classes: vec!["0".into(), "1".into()],
            coefficients: vec![coef],
            intercepts: vec![intercept],
            means: None,
            scales: None,
        }
    }

    #[test]
    fn test_binary_logistic_is_sigmoid() {
        let model = binary(vec![0.0; 6], 0.0);
        let p = model.predict_proba(&[1.0; 6]).unwrap();
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((p[1] - 0.5).abs() < 1e-12);

        let model = binary(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.0);
        let p = model.predict_proba(&[2.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert!((p[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let model = LogisticModel {
            classes: vec!["field_goal".into(), "pass".into(), "punt".into(), "run".into()],
            coefficients: vec![vec![0.1; 9], vec![-0.2; 9], vec![0.05; 9], vec![0.3; 9]],
            intercepts: vec![0.0, 1.0, -1.0, 0.5],
            means: Some(vec![2.0; 9]),
            scales: Some(vec![3.0; 9]),
        };
        assert!(model.validate().is_ok());
        let p = model.predict_proba(&[1.0, 10.0, -3.0, 600.0, 2.0, 65.0, 44.0, -2.5, 3.0]).unwrap();
        assert_eq!(p.len(), 4);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_feature_contract_violations() {
        let model = binary(vec![0.0; 6], 0.0);
        assert_eq!(
            model.predict_proba(&[0.0; 4]),
            Err(InferenceError::FeatureCount { expected: 6, found: 4 })
        );
        assert_eq!(
            model.predict_proba(&[0.0, 0.0, f64::NAN, 0.0, 0.0, 0.0]),
            Err(InferenceError::NonFinite { index: 2 })
        );
    }

    #[test]
    fn test_playcall_columns_follow_labels_not_position() {
        let fixed = FixedProbabilities::new(
            &["run", "punt", "pass", "field_goal"],
            &[0.4, 0.1, 0.45, 0.05],
            PLAYCALL_FEATURES,
        );
        let model = PlayCallModel::new(Box::new(fixed)).unwrap();
        let p = model.probabilities(&[0.0; PLAYCALL_FEATURES]).unwrap();
        assert_eq!(p[PlayType::Pass.index()], 0.45);
        assert_eq!(p[PlayType::Run.index()], 0.4);
        assert_eq!(p[PlayType::Punt.index()], 0.1);
        assert_eq!(p[PlayType::FieldGoal.index()], 0.05);
    }

    #[test]
    fn test_playcall_missing_class_rejected() {
        let fixed = FixedProbabilities::new(&["run", "pass", "punt"], &[0.5, 0.4, 0.1], PLAYCALL_FEATURES);
        assert!(matches!(PlayCallModel::new(Box::new(fixed)), Err(SimError::InvalidBundle(_))));
    }

    #[test]
    fn test_outcome_model_width_checked() {
        let fixed = FixedProbabilities::new(&["missed", "made"], &[0.2, 0.8], 4);
        assert!(OutcomeModel::field_goal(Box::new(fixed)).is_err());

        let fixed = FixedProbabilities::new(&["missed", "made"], &[0.2, 0.8], FIELD_GOAL_FEATURES);
        let model = OutcomeModel::field_goal(Box::new(fixed)).unwrap();
        assert_eq!(model.success_column(), 1);
        assert_eq!(model.success_probability(&[0.0; FIELD_GOAL_FEATURES]).unwrap(), 0.8);
    }

    #[test]
    fn test_spec_round_trip_through_json() {
        let spec = ClassifierSpec::Fixed(FixedProbabilities::new(&["0", "1"], &[0.35, 0.65], 6));
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"kind\":\"fixed\""));
        let back: ClassifierSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}

//! Symmetric ("oblivious") gradient-boosted tree ensemble.
//!
//! Every level of an oblivious tree applies the same split, so a tree of depth
//! `d` is just `d` conditions and `2^d` leaves. Condition `k` contributes bit
//! `k` of the leaf index:
//!
//! ```text
//! leaf = Σ_k [condition_k holds] << k
//! raw  = bias + scale * Σ_trees leaf_values[leaf]
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{FeatureKind, FeatureValue, FeatureVector};

/// Failure while evaluating a loaded model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("model produced an undefined value (NaN)")]
    NotANumber,

    #[error("feature #{index} is {actual:?} but the split expects {expected:?}")]
    FeatureKindMismatch {
        index: usize,
        expected: FeatureKind,
        actual: FeatureKind,
    },
}

/// Anything that maps a feature vector to a raw scalar estimate.
pub trait Regressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError>;
}

/// One tree condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Split {
    /// Holds when the numeric feature is strictly greater than `border`.
    Float { feature: usize, border: f64 },
    /// Holds when the categorical feature equals `value`.
    OneHot { feature: usize, value: String },
}

impl Split {
    pub fn feature(&self) -> usize {
        match self {
            Split::Float { feature, .. } | Split::OneHot { feature, .. } => *feature,
        }
    }

    pub fn expected_kind(&self) -> FeatureKind {
        match self {
            Split::Float { .. } => FeatureKind::Numeric,
            Split::OneHot { .. } => FeatureKind::Categorical,
        }
    }

    fn holds(&self, value: FeatureValue<'_>) -> Result<bool, PredictionError> {
        match (self, value) {
            (Split::Float { border, .. }, FeatureValue::Numeric(v)) => Ok(v > *border),
            (Split::OneHot { value: want, .. }, FeatureValue::Categorical(s)) => Ok(s == want.as_str()),
            _ => Err(PredictionError::FeatureKindMismatch {
                index: self.feature(),
                expected: self.expected_kind(),
                actual: value.kind(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObliviousTree {
    pub splits: Vec<Split>,
    pub leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn leaf_index(&self, values: &[FeatureValue<'_>]) -> Result<usize, PredictionError> {
        let mut index = 0usize;
        for (bit, split) in self.splits.iter().enumerate() {
            if split.holds(values[split.feature()])? {
                index |= 1 << bit;
            }
        }
        Ok(index)
    }
}

/// A validated, ready-to-query ensemble.
///
/// Only [`crate::models::load_model`] (and tests) construct one, after the
/// artifact has been checked against the feature contract, so leaf lookups and
/// feature indices are always in range.
#[derive(Debug, Clone, PartialEq)]
pub struct ObliviousEnsemble {
    pub(crate) trees: Vec<ObliviousTree>,
    pub(crate) scale: f64,
    pub(crate) bias: f64,
}

impl ObliviousEnsemble {
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn depth(&self) -> usize {
        self.trees.iter().map(|t| t.splits.len()).max().unwrap_or(0)
    }
}

impl Regressor for ObliviousEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        let values = features.values();

        let mut sum = 0.0;
        for tree in &self.trees {
            let leaf = tree.leaf_index(&values)?;
            sum += tree.leaf_values[leaf];
        }

        // Overflow to ±inf is left for the caller's clamp.
        let raw = self.bias + self.scale * sum;
        if raw.is_nan() {
            return Err(PredictionError::NotANumber);
        }
        Ok(raw)
    }
}

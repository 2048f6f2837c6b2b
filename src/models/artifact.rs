//! Model artifact loading and validation.
//!
//! The artifact is a JSON document describing an oblivious tree ensemble plus
//! the feature contract it was trained against:
//!
//! ```json
//! {
//!   "format": "oblivious-trees",
//!   "version": 1,
//!   "features": [{ "name": "cylinders", "kind": "categorical" }, ...],
//!   "trees": [{ "splits": [{ "type": "float", "feature": 3, "border": 2800.0 }],
//!               "leaf_values": [8.0, -1.0] }],
//!   "scale": 1.0,
//!   "bias": 23.5
//! }
//! ```
//!
//! Loading checks the artifact against [`FEATURE_NAMES`]/[`FEATURE_KINDS`] so
//! that evaluation never indexes out of range.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::features::{FEATURE_COUNT, FEATURE_KINDS, FEATURE_NAMES, FeatureKind};
use crate::models::model::{ObliviousEnsemble, ObliviousTree, Split};

/// File name of the artifact next to the executable.
pub const MODEL_FILE_NAME: &str = "mpg_predictor.json";

pub const ARTIFACT_FORMAT: &str = "oblivious-trees";
pub const ARTIFACT_VERSION: u32 = 1;

/// Deepest tree accepted; keeps `1 << depth` well inside `usize`.
pub const MAX_TREE_DEPTH: usize = 16;

/// Why a model artifact could not be turned into a usable model.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file '{}' not found", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read model file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model file '{}' is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model file '{}' is incompatible: {reason}", .path.display())]
    Incompatible {
        path: PathBuf,
        #[source]
        reason: ArtifactMismatch,
    },
}

/// How a well-formed artifact disagrees with what this build can evaluate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtifactMismatch {
    #[error("unsupported format '{found}' (expected '{}')", ARTIFACT_FORMAT)]
    Format { found: String },

    #[error("unsupported version {found} (expected {})", ARTIFACT_VERSION)]
    Version { found: u32 },

    #[error("model expects {found} features, this build provides {}", FEATURE_COUNT)]
    FeatureCount { found: usize },

    #[error("feature #{index} is '{found}', expected '{expected}'")]
    FeatureName {
        index: usize,
        found: String,
        expected: &'static str,
    },

    #[error("feature '{name}' is {found:?}, expected {expected:?}")]
    KindMismatch {
        name: String,
        found: FeatureKind,
        expected: FeatureKind,
    },

    #[error("scale and bias must be finite")]
    NonFiniteParameters,

    #[error("tree {tree} has depth {depth} (max {})", MAX_TREE_DEPTH)]
    TreeTooDeep { tree: usize, depth: usize },

    #[error("tree {tree} has {found} leaf values, expected {expected} for depth {depth}")]
    LeafCount {
        tree: usize,
        found: usize,
        expected: usize,
        depth: usize,
    },

    #[error("tree {tree} has non-finite leaf values")]
    NonFiniteLeaf { tree: usize },

    #[error("tree {tree} splits on unknown feature #{feature}")]
    UnknownFeature { tree: usize, feature: usize },

    #[error("tree {tree} applies a {split} split to {kind:?} feature '{feature}'")]
    SplitKind {
        tree: usize,
        split: &'static str,
        kind: FeatureKind,
        feature: &'static str,
    },
}

/// A named input column as recorded by the training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
}

/// On-disk representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,
    pub version: u32,
    pub features: Vec<FeatureSpec>,
    pub trees: Vec<ObliviousTree>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub bias: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl ModelArtifact {
    /// Check the artifact against the feature contract and build the model.
    pub fn into_model(self) -> Result<ObliviousEnsemble, ArtifactMismatch> {
        if self.format != ARTIFACT_FORMAT {
            return Err(ArtifactMismatch::Format { found: self.format });
        }
        if self.version != ARTIFACT_VERSION {
            return Err(ArtifactMismatch::Version { found: self.version });
        }

        validate_feature_contract(&self.features)?;

        if !(self.scale.is_finite() && self.bias.is_finite()) {
            return Err(ArtifactMismatch::NonFiniteParameters);
        }

        for (t, tree) in self.trees.iter().enumerate() {
            validate_tree(t, tree)?;
        }

        Ok(ObliviousEnsemble {
            trees: self.trees,
            scale: self.scale,
            bias: self.bias,
        })
    }
}

fn validate_feature_contract(features: &[FeatureSpec]) -> Result<(), ArtifactMismatch> {
    if features.len() != FEATURE_COUNT {
        return Err(ArtifactMismatch::FeatureCount { found: features.len() });
    }
    for (i, feature) in features.iter().enumerate() {
        if feature.name != FEATURE_NAMES[i] {
            return Err(ArtifactMismatch::FeatureName {
                index: i,
                found: feature.name.clone(),
                expected: FEATURE_NAMES[i],
            });
        }
        if feature.kind != FEATURE_KINDS[i] {
            return Err(ArtifactMismatch::KindMismatch {
                name: feature.name.clone(),
                found: feature.kind,
                expected: FEATURE_KINDS[i],
            });
        }
    }
    Ok(())
}

fn validate_tree(t: usize, tree: &ObliviousTree) -> Result<(), ArtifactMismatch> {
    let depth = tree.splits.len();
    if depth > MAX_TREE_DEPTH {
        return Err(ArtifactMismatch::TreeTooDeep { tree: t, depth });
    }
    let leaves = 1usize << depth;
    if tree.leaf_values.len() != leaves {
        return Err(ArtifactMismatch::LeafCount {
            tree: t,
            found: tree.leaf_values.len(),
            expected: leaves,
            depth,
        });
    }
    if tree.leaf_values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactMismatch::NonFiniteLeaf { tree: t });
    }
    for split in &tree.splits {
        let feature = split.feature();
        if feature >= FEATURE_COUNT {
            return Err(ArtifactMismatch::UnknownFeature { tree: t, feature });
        }
        let kind = FEATURE_KINDS[feature];
        if split.expected_kind() != kind {
            return Err(ArtifactMismatch::SplitKind {
                tree: t,
                split: match split {
                    Split::Float { .. } => "float",
                    Split::OneHot { .. } => "one_hot",
                },
                kind,
                feature: FEATURE_NAMES[feature],
            });
        }
    }
    Ok(())
}

/// Read and validate a model artifact.
pub fn load_model(path: &Path) -> Result<ObliviousEnsemble, ModelLoadError> {
    let result = read_artifact(path).and_then(|artifact| {
        artifact
            .into_model()
            .map_err(|reason| ModelLoadError::Incompatible {
                path: path.to_path_buf(),
                reason,
            })
    });

    match &result {
        Ok(model) => info!(
            path = %path.display(),
            trees = model.tree_count(),
            depth = model.depth(),
            "model loaded"
        ),
        Err(err) => error!(path = %path.display(), %err, "model load failed"),
    }
    result
}

fn read_artifact(path: &Path) -> Result<ModelArtifact, ModelLoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ModelLoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            ModelLoadError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            ModelLoadError::Corrupt {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Resolve the artifact location.
///
/// An explicit path wins; otherwise the artifact is expected next to the
/// running executable.
pub fn resolve_model_path(explicit: Option<&Path>) -> Result<PathBuf, ModelLoadError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let exe = std::env::current_exe().map_err(|source| ModelLoadError::Io {
        path: PathBuf::from(MODEL_FILE_NAME),
        source,
    })?;
    Ok(default_model_path(&exe))
}

fn default_model_path(exe: &Path) -> PathBuf {
    exe.parent()
        .unwrap_or_else(|| Path::new("."))
        .join(MODEL_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::{Cylinders, Origin, VehicleSpec};
    use crate::features::transform;
    use crate::models::Regressor;

    const DEMO_ARTIFACT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/mpg_predictor.json");

    fn temp_artifact(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mpg-predictor-tests-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn feature_list() -> Vec<FeatureSpec> {
        FEATURE_NAMES
            .iter()
            .zip(FEATURE_KINDS)
            .map(|(name, kind)| FeatureSpec {
                name: name.to_string(),
                kind,
            })
            .collect()
    }

    fn artifact(trees: Vec<ObliviousTree>) -> ModelArtifact {
        ModelArtifact {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            features: feature_list(),
            trees,
            scale: 1.0,
            bias: 20.0,
        }
    }

    fn incompatible_reason(name: &str, artifact: ModelArtifact) -> ArtifactMismatch {
        let path = temp_artifact(name, &serde_json::to_string(&artifact).unwrap());
        match load_model(&path) {
            Err(ModelLoadError::Incompatible { reason, .. }) => reason,
            other => panic!("expected incompatible, got {other:?}"),
        }
    }

    #[test]
    fn demo_artifact_loads() {
        let model = load_model(Path::new(DEMO_ARTIFACT)).unwrap();
        assert_eq!(model.tree_count(), 5);
        assert_eq!(model.depth(), 2);
    }

    #[test]
    fn demo_artifact_reference_predictions() {
        let model = load_model(Path::new(DEMO_ARTIFACT)).unwrap();

        let reference = model.predict(&transform(&VehicleSpec::default())).unwrap();
        assert!((reference - 21.5).abs() < 1e-9, "reference car: got {reference}");

        let light = VehicleSpec {
            weight: 2000.0,
            horsepower: 60.0,
            displacement: 90.0,
            acceleration: 19.0,
            model_year: 82,
            cylinders: Cylinders::Four,
            origin: Origin::Asia,
        };
        let light_mpg = model.predict(&transform(&light)).unwrap();
        assert!((light_mpg - 38.5).abs() < 1e-9, "light car: got {light_mpg}");

        let heavy = VehicleSpec {
            weight: 4500.0,
            horsepower: 220.0,
            displacement: 400.0,
            acceleration: 9.0,
            model_year: 70,
            cylinders: Cylinders::Eight,
            origin: Origin::Usa,
        };
        let heavy_mpg = model.predict(&transform(&heavy)).unwrap();
        assert!((heavy_mpg - 8.5).abs() < 1e-9, "heavy car: got {heavy_mpg}");
    }

    #[test]
    fn round_trips_through_json() {
        let a = artifact(vec![ObliviousTree {
            splits: vec![Split::OneHot { feature: 6, value: "2".to_string() }],
            leaf_values: vec![0.0, 3.0],
        }]);
        let path = temp_artifact("roundtrip.json", &serde_json::to_string_pretty(&a).unwrap());
        let model = load_model(&path).unwrap();

        let europe = transform(&VehicleSpec {
            origin: Origin::Europe,
            ..VehicleSpec::default()
        });
        assert_eq!(model.predict(&europe).unwrap(), 23.0);
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let path = std::env::temp_dir().join("mpg-predictor-definitely-absent.json");
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Missing { .. }), "got {err:?}");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let path = temp_artifact("garbage.json", "CBM\u{1}\u{2} not json");
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Corrupt { .. }), "got {err:?}");

        let path = temp_artifact("truncated.json", r#"{"format": "oblivious-trees", "version": 1"#);
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Corrupt { .. }), "got {err:?}");
    }

    #[test]
    fn wrong_format_or_version_is_incompatible() {
        let mut a = artifact(vec![]);
        a.format = "catboost-binary".to_string();
        assert_eq!(
            incompatible_reason("format.json", a),
            ArtifactMismatch::Format { found: "catboost-binary".to_string() }
        );

        let mut a = artifact(vec![]);
        a.version = 2;
        let reason = incompatible_reason("version.json", a);
        assert_eq!(reason, ArtifactMismatch::Version { found: 2 });
        assert_eq!(reason.to_string(), "unsupported version 2 (expected 1)");
    }

    #[test]
    fn reordered_features_are_incompatible() {
        let mut a = artifact(vec![]);
        a.features.swap(2, 3);
        let reason = incompatible_reason("reordered.json", a);
        assert_eq!(
            reason,
            ArtifactMismatch::FeatureName {
                index: 2,
                found: "weight".to_string(),
                expected: "horsepower",
            }
        );
    }

    #[test]
    fn wrong_feature_kind_is_incompatible() {
        let mut a = artifact(vec![]);
        a.features[0].kind = FeatureKind::Numeric;
        a.features.push(FeatureSpec {
            name: "extra".to_string(),
            kind: FeatureKind::Numeric,
        });
        let reason = incompatible_reason("extra-feature.json", a);
        assert_eq!(reason, ArtifactMismatch::FeatureCount { found: 11 });
        assert!(reason.to_string().contains("expects 11 features"));

        let mut a = artifact(vec![]);
        a.features[0].kind = FeatureKind::Numeric;
        assert!(matches!(
            incompatible_reason("kind.json", a),
            ArtifactMismatch::KindMismatch { ref name, .. } if name == "cylinders"
        ));
    }

    #[test]
    fn malformed_trees_are_incompatible() {
        let a = artifact(vec![ObliviousTree {
            splits: vec![Split::Float { feature: 3, border: 1.0 }],
            leaf_values: vec![1.0, 2.0, 3.0],
        }]);
        assert_eq!(
            incompatible_reason("leaves.json", a),
            ArtifactMismatch::LeafCount { tree: 0, found: 3, expected: 2, depth: 1 }
        );

        let a = artifact(vec![ObliviousTree {
            splits: vec![Split::Float { feature: 10, border: 1.0 }],
            leaf_values: vec![1.0, 2.0],
        }]);
        assert_eq!(
            incompatible_reason("unknown-feature.json", a),
            ArtifactMismatch::UnknownFeature { tree: 0, feature: 10 }
        );

        let a = artifact(vec![ObliviousTree {
            splits: vec![Split::Float { feature: 0, border: 4.0 }],
            leaf_values: vec![1.0, 2.0],
        }, ObliviousTree {
            splits: vec![],
            leaf_values: vec![0.0],
        }]);
        let reason = incompatible_reason("split-kind.json", a);
        assert!(matches!(reason, ArtifactMismatch::SplitKind { tree: 0, split: "float", .. }));
        assert!(reason.to_string().contains("float split"), "got {reason}");
    }

    #[test]
    fn defaults_scale_and_bias() {
        let json = serde_json::json!({
            "format": ARTIFACT_FORMAT,
            "version": ARTIFACT_VERSION,
            "features": feature_list(),
            "trees": [{ "splits": [], "leaf_values": [17.0] }],
        });
        let a: ModelArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(a.scale, 1.0);
        assert_eq!(a.bias, 0.0);
        let model = a.into_model().unwrap();
        assert_eq!(model.predict(&transform(&VehicleSpec::default())).unwrap(), 17.0);
    }

    #[test]
    fn explicit_path_wins_and_default_sits_next_to_exe() {
        let explicit = Path::new("/opt/models/custom.json");
        assert_eq!(resolve_model_path(Some(explicit)).unwrap(), explicit);

        let path = default_model_path(Path::new("/usr/local/bin/mpg"));
        assert_eq!(path, Path::new("/usr/local/bin/mpg_predictor.json"));
    }
}

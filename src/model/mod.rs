use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{Result, SatisfactionError};
use crate::features::FeatureRow;

pub mod tree;
#[cfg(feature = "torch")]
pub mod torch;

pub use tree::DecisionTree;

/// An already-trained classifier, used for inference only.
pub trait Classifier: Send + Sync {
    /// Ordered input columns fixed at training time, if the artifact kept them.
    fn feature_names(&self) -> Option<&[String]>;

    /// Known categories; `predict_proba` is aligned with this order.
    fn classes(&self) -> &[String];

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>>;

    /// Label of the most probable class (first one on ties).
    fn predict(&self, row: &FeatureRow) -> Result<String> {
        let proba = self.predict_proba(row)?;
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in proba.iter().copied().enumerate() {
            if best.map_or(true, |(_, b)| p > b) {
                best = Some((i, p));
            }
        }
        let (idx, _) = best.ok_or_else(|| {
            SatisfactionError::Inference("classifier returned no probabilities".into())
        })?;
        self.classes().get(idx).cloned().ok_or_else(|| {
            SatisfactionError::SchemaMismatch(format!(
                "argmax index {} outside category list of {}",
                idx,
                self.classes().len()
            ))
        })
    }

    fn backend_name(&self) -> &str;
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetaJson {
    pub feat_list: Vec<String>,
    #[serde(default)]
    pub classes: Option<Vec<String>>,
    #[serde(default)]
    pub in_dim: Option<usize>,
    #[serde(default)]
    pub outputs_logits: bool,
}

impl MetaJson {
    pub fn load(meta_path: &str) -> Result<Self> {
        let meta_txt = fs::read_to_string(Path::new(meta_path))
            .map_err(|e| SatisfactionError::artifact(meta_path, format!("failed to read meta: {}", e)))?;
        let meta: MetaJson = serde_json::from_str(&meta_txt)
            .map_err(|e| SatisfactionError::artifact(meta_path, format!("failed to parse meta: {}", e)))?;

        if let Some(in_dim) = meta.in_dim {
            if in_dim != meta.feat_list.len() {
                tracing::warn!(
                    "meta.in_dim ({}) != feat_list.len() ({}); using feat_list.len()",
                    in_dim,
                    meta.feat_list.len()
                );
            }
        }
        Ok(meta)
    }
}

/// Loaded classifier plus the optional metadata sidecar. The sidecar only
/// supplies the column list when the artifact has none of its own.
pub struct Model {
    backend: Box<dyn Classifier>,
    feat_list: Option<Vec<String>>,
}

impl Model {
    pub fn new(backend: Box<dyn Classifier>, feat_list: Option<Vec<String>>) -> Self {
        Self { backend, feat_list }
    }

    /// Picks the backend from the artifact's extension.
    pub fn load(model_path: &str, meta_path: Option<&str>) -> Result<Self> {
        let meta = meta_path.map(MetaJson::load).transpose()?;

        let ext = Path::new(model_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let backend: Box<dyn Classifier> = match ext.as_str() {
            "json" => {
                let tree = DecisionTree::load(model_path)?;
                if let Some(classes) = meta.as_ref().and_then(|m| m.classes.as_ref()) {
                    if classes.as_slice() != tree.classes() {
                        return Err(SatisfactionError::artifact(
                            model_path,
                            format!(
                                "meta classes {:?} disagree with tree classes {:?}",
                                classes,
                                tree.classes()
                            ),
                        ));
                    }
                }
                // split indices are positions in the tree's own training order
                if let (Some(names), Some(m)) = (tree.feature_names(), meta.as_ref()) {
                    if m.feat_list.as_slice() != names {
                        return Err(SatisfactionError::artifact(
                            model_path,
                            format!(
                                "meta feat_list ({} columns) disagrees with the tree's feature_names_in ({} columns)",
                                m.feat_list.len(),
                                names.len()
                            ),
                        ));
                    }
                }
                Box::new(tree)
            }
            #[cfg(feature = "torch")]
            "pt" | "ts" => {
                let meta = meta.as_ref().ok_or_else(|| {
                    SatisfactionError::artifact(model_path, "TorchScript models need META_PATH")
                })?;
                Box::new(torch::TorchClassifier::load(model_path, meta)?)
            }
            #[cfg(not(feature = "torch"))]
            "pt" | "ts" => {
                return Err(SatisfactionError::artifact(
                    model_path,
                    "TorchScript support not compiled in (enable the `torch` feature)",
                ))
            }
            other => {
                return Err(SatisfactionError::artifact(
                    model_path,
                    format!("unknown artifact kind {:?}", other),
                ))
            }
        };

        Ok(Self::new(backend, meta.map(|m| m.feat_list)))
    }

    /// Expected column list, or SchemaMismatch if neither the sidecar nor the
    /// artifact carries one.
    pub fn expected_columns(&self) -> Result<&[String]> {
        self.feature_names().ok_or_else(|| {
            SatisfactionError::SchemaMismatch(
                "classifier artifact does not expose its expected input columns".into(),
            )
        })
    }
}

impl Classifier for Model {
    fn feature_names(&self) -> Option<&[String]> {
        self.backend.feature_names().or(self.feat_list.as_deref())
    }

    fn classes(&self) -> &[String] {
        self.backend.classes()
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        self.backend.predict_proba(row)
    }

    fn predict(&self, row: &FeatureRow) -> Result<String> {
        self.backend.predict(row)
    }

    fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }
}

//! Decision tree exported to JSON from a fitted tree classifier.
//!
//! Nodes are stored flat; node 0 is the root. A node whose `left` child is
//! `-1` is a leaf, and its `value` holds per-class sample counts (or
//! fractions) in the order of `classes`.

use serde::Deserialize;
use std::fs;

use super::Classifier;
use crate::error::{Result, SatisfactionError};
use crate::features::FeatureRow;

const LEAF: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    pub feature: i64,
    pub threshold: f64,
    pub left: i64,
    pub right: i64,
    pub value: Vec<f64>,
}

impl TreeNode {
    fn is_leaf(&self) -> bool {
        self.left == LEAF
    }
}

#[derive(Debug, Deserialize)]
struct TreeJson {
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
    classes: Vec<String>,
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    feature_names: Option<Vec<String>>,
    classes: Vec<String>,
    nodes: Vec<TreeNode>,
}

fn bad_tree(reason: impl ToString) -> SatisfactionError {
    SatisfactionError::artifact("<tree>", reason)
}

impl DecisionTree {
    pub fn new(
        feature_names: Option<Vec<String>>,
        classes: Vec<String>,
        nodes: Vec<TreeNode>,
    ) -> Result<Self> {
        if classes.is_empty() {
            return Err(bad_tree("tree has no classes"));
        }
        if nodes.is_empty() {
            return Err(bad_tree("tree has no nodes"));
        }
        let n = nodes.len() as i64;
        for (i, node) in nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.value.len() != classes.len() {
                    return Err(bad_tree(format!(
                        "leaf {} has {} values for {} classes",
                        i,
                        node.value.len(),
                        classes.len()
                    )));
                }
                continue;
            }
            // children always come after their parent in an exported tree
            let ok = |c: i64| c > i as i64 && c < n;
            if !ok(node.left) || !ok(node.right) {
                return Err(bad_tree(format!(
                    "node {} has children ({}, {}) outside 0..{}",
                    i, node.left, node.right, n
                )));
            }
            if node.feature < 0 {
                return Err(bad_tree(format!("split node {} has no feature", i)));
            }
            if let Some(names) = &feature_names {
                if node.feature as usize >= names.len() {
                    return Err(bad_tree(format!(
                        "node {} splits on feature {} but only {} are named",
                        i,
                        node.feature,
                        names.len()
                    )));
                }
            }
        }
        Ok(Self {
            feature_names,
            classes,
            nodes,
        })
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let raw: TreeJson = serde_json::from_str(s).map_err(bad_tree)?;
        Self::new(raw.feature_names_in, raw.classes, raw.nodes)
    }

    pub fn load(path: &str) -> Result<Self> {
        let txt = fs::read_to_string(path).map_err(|e| SatisfactionError::artifact(path, e))?;
        let tree = Self::from_json(&txt).map_err(|e| match e {
            SatisfactionError::ArtifactLoad { reason, .. } => SatisfactionError::artifact(path, reason),
            other => other,
        })?;
        tracing::debug!(
            "decision tree {}: {} nodes, {} classes",
            path,
            tree.nodes.len(),
            tree.classes.len()
        );
        Ok(tree)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn leaf_for(&self, x: &[f32]) -> Result<&TreeNode> {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return Ok(node);
            }
            let f = node.feature as usize;
            let v = x.get(f).ok_or_else(|| {
                SatisfactionError::SchemaMismatch(format!(
                    "tree splits on feature {} but the row has {} columns",
                    f,
                    x.len()
                ))
            })?;
            // rows are f32, thresholds f64; compare in f64
            idx = if f64::from(*v) <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }
}

impl Classifier for DecisionTree {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let leaf = self.leaf_for(row.values())?;
        let total: f64 = leaf.value.iter().sum();
        if total.is_nan() || total <= 0.0 {
            return Err(SatisfactionError::Inference(format!(
                "leaf with non-positive weight {}",
                total
            )));
        }
        Ok(leaf.value.iter().map(|v| v / total).collect())
    }

    fn backend_name(&self) -> &str {
        "decision_tree"
    }
}

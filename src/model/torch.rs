use tch::{kind::Kind, CModule, Device, Tensor};

use super::{Classifier, MetaJson};
use crate::error::{Result, SatisfactionError};
use crate::features::FeatureRow;

/// TorchScript classifier: `[1, in_dim]` floats in, `[1, n_classes]` scores out.
pub struct TorchClassifier {
    model: CModule,
    device: Device,
    in_dim: usize,
    classes: Vec<String>,
    feat_list: Vec<String>,
    outputs_logits: bool,
}

impl TorchClassifier {
    pub fn load(model_path: &str, meta: &MetaJson) -> Result<Self> {
        let device = Device::Cpu;
        let classes = meta
            .classes
            .clone()
            .ok_or_else(|| SatisfactionError::artifact(model_path, "meta.json has no classes"))?;
        let in_dim = meta.feat_list.len();

        let model = CModule::load_on_device(model_path, device)
            .map_err(|e| SatisfactionError::artifact(model_path, format!("failed to load TorchScript: {}", e)))?;

        // Check the output shape with a dummy forward, expect [B=1, C]
        let dummy = Tensor::zeros([1, in_dim as i64], (Kind::Float, device));
        let t = model
            .forward_ts(&[dummy])
            .map_err(|e| SatisfactionError::artifact(model_path, e))?;
        let sz = t.size();
        if sz.len() != 2 || sz[0] != 1 || sz[1] as usize != classes.len() {
            return Err(SatisfactionError::artifact(
                model_path,
                format!("unexpected model output size {:?} for {} classes", sz, classes.len()),
            ));
        }

        Ok(Self {
            model,
            device,
            in_dim,
            classes,
            feat_list: meta.feat_list.clone(),
            outputs_logits: meta.outputs_logits,
        })
    }
}

impl Classifier for TorchClassifier {
    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feat_list)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        if row.len() != self.in_dim {
            return Err(SatisfactionError::SchemaMismatch(format!(
                "feature length mismatch: got {}, expected {}",
                row.len(),
                self.in_dim
            )));
        }

        let input = Tensor::from_slice(row.values())
            .reshape([1, self.in_dim as i64])
            .to_device(self.device);

        let mut out = self
            .model
            .forward_ts(&[input])
            .map_err(|e| SatisfactionError::Inference(e.to_string()))?;
        if self.outputs_logits {
            out = out.softmax(-1, Kind::Float);
        }

        Ok((0..self.classes.len())
            .map(|i| out.double_value(&[0, i as i64]))
            .collect())
    }

    fn backend_name(&self) -> &str {
        "torchscript"
    }
}

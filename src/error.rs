use thiserror::Error;

pub type Result<T> = std::result::Result<T, SatisfactionError>;

#[derive(Debug, Error)]
pub enum SatisfactionError {
    #[error("failed to load classifier artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("failed to load reference dataset {path}: {reason}")]
    DatasetLoad { path: String, reason: String },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("predicted category {0:?} is not in the classifier's category list")]
    UnknownCategory(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("reference population is empty")]
    EmptyPopulation,

    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

impl SatisfactionError {
    pub(crate) fn artifact(path: &str, reason: impl ToString) -> Self {
        Self::ArtifactLoad {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn dataset(path: &str, reason: impl ToString) -> Self {
        Self::DatasetLoad {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Faults that mean the artifact and our column/category assumptions drifted apart.
    pub fn is_prediction_fault(&self) -> bool {
        matches!(
            self,
            Self::SchemaMismatch(_) | Self::UnknownCategory(_) | Self::Inference(_)
        )
    }
}

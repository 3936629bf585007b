use std::env;

/// Process configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Classifier artifact (`.json` decision tree, `.pt`/`.ts` TorchScript)
    pub model_path: String,

    /// Optional sidecar with the authoritative column list
    pub meta_path: Option<String>,

    /// Reference population CSV
    pub dataset_path: String,

    pub port: u16,

    /// Log a summary of every aligned feature row
    pub log_pred: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: "decision_tree_airline.json".to_string(),
            meta_path: None,
            dataset_path: "airline.csv".to_string(),
            port: 8501,
            log_pred: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            model_path: get("MODEL_PATH").unwrap_or(d.model_path),
            meta_path: get("META_PATH").filter(|s| !s.is_empty()),
            dataset_path: get("DATASET_PATH").unwrap_or(d.dataset_path),
            port: get("PORT").and_then(|s| s.parse().ok()).unwrap_or(d.port),
            log_pred: get("LOG_PRED").as_deref() == Some("1"),
        }
    }
}

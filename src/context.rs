use serde::Serialize;
use std::sync::Arc;

use crate::cohort::{compare, CohortPercentage, PopulationTable};
use crate::config::Config;
use crate::error::{Result, SatisfactionError};
use crate::model::{Classifier, Model};
use crate::predictor::{feature_row, predict_row};
use crate::types::{PassengerProfile, PredictionResult};

/// Outcome of one predict + compare cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub profile: PassengerProfile,
    pub prediction: PredictionResult,
    pub comparisons: Vec<CohortPercentage>,
}

/// Classifier and reference population, loaded once and read-only afterwards.
#[derive(Clone)]
pub struct AppContext {
    classifier: Arc<dyn Classifier>,
    population: Arc<PopulationTable>,
    log_pred: bool,
}

impl AppContext {
    pub fn new(classifier: Arc<dyn Classifier>, population: Arc<PopulationTable>) -> Self {
        Self {
            classifier,
            population,
            log_pred: false,
        }
    }

    pub fn with_row_logging(mut self, on: bool) -> Self {
        self.log_pred = on;
        self
    }

    /// Load both artifacts and check them against each other before serving.
    pub fn init(cfg: &Config) -> Result<Self> {
        let model = Model::load(&cfg.model_path, cfg.meta_path.as_deref())?;
        tracing::info!(
            "loaded {} classifier from {}; classes: {:?}",
            model.backend_name(),
            cfg.model_path,
            model.classes()
        );
        if let Some(cols) = model.feature_names() {
            tracing::info!("feat_list[{}]: {:?}", cols.len(), cols);
        }

        let population = PopulationTable::load(&cfg.dataset_path)?;
        if population.is_empty() {
            return Err(SatisfactionError::EmptyPopulation);
        }
        tracing::info!("reference population: {} records from {}", population.len(), cfg.dataset_path);

        let ctx = Self::new(Arc::new(model), Arc::new(population)).with_row_logging(cfg.log_pred);
        ctx.warmup()?;
        Ok(ctx)
    }

    /// Evaluates the default form once so column or category drift fails at startup.
    pub fn warmup(&self) -> Result<Report> {
        let r = self.evaluate(&PassengerProfile::default())?;
        tracing::info!(
            "warmup ok: {} ({:.1}%)",
            r.prediction.predicted_category,
            r.prediction.confidence_percentage
        );
        Ok(r)
    }

    pub fn evaluate(&self, profile: &PassengerProfile) -> Result<Report> {
        let row = feature_row(profile, self.classifier.as_ref())?;
        if self.log_pred {
            tracing::info!("row {}", row.summary());
        }
        let prediction = predict_row(&row, self.classifier.as_ref())?;
        let comparisons = compare(profile, &self.population)?;
        Ok(Report {
            profile: profile.clone(),
            prediction,
            comparisons,
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn population(&self) -> &PopulationTable {
        &self.population
    }
}

use crate::error::{Result, SatisfactionError};
use crate::features::{build_row, FeatureRow};
use crate::model::Classifier;
use crate::types::{round1, PassengerProfile, PredictionResult};

/// Expand and align the profile onto the classifier's expected columns.
pub fn feature_row<C: Classifier + ?Sized>(
    profile: &PassengerProfile,
    classifier: &C,
) -> Result<FeatureRow> {
    let feat_list = classifier.feature_names().ok_or_else(|| {
        SatisfactionError::SchemaMismatch(
            "classifier artifact does not expose its expected input columns".into(),
        )
    })?;
    Ok(build_row(profile, feat_list))
}

pub fn predict<C: Classifier + ?Sized>(
    profile: &PassengerProfile,
    classifier: &C,
) -> Result<PredictionResult> {
    let row = feature_row(profile, classifier)?;
    predict_row(&row, classifier)
}

/// Inference on an already aligned row.
pub fn predict_row<C: Classifier + ?Sized>(
    row: &FeatureRow,
    classifier: &C,
) -> Result<PredictionResult> {
    let label = classifier.predict(row)?;
    let proba = classifier.predict_proba(row)?;

    let classes = classifier.classes();
    if proba.len() != classes.len() {
        return Err(SatisfactionError::SchemaMismatch(format!(
            "{} probabilities for {} categories",
            proba.len(),
            classes.len()
        )));
    }
    if let Some(bad) = proba.iter().find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0) {
        return Err(SatisfactionError::Inference(format!(
            "probability {} outside [0, 1]",
            bad
        )));
    }

    let idx = classes
        .iter()
        .position(|c| *c == label)
        .ok_or_else(|| SatisfactionError::UnknownCategory(label.clone()))?;

    Ok(PredictionResult {
        predicted_category: label,
        confidence_percentage: round1(proba[idx] * 100.0),
    })
}

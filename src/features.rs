use std::collections::HashMap;

use serde::Serialize;

use crate::types::PassengerProfile;

pub const CATEGORICAL_FIELDS: [&str; 3] = ["customer_type", "type_of_travel", "class"];

/// Model-ready row: values in exactly the classifier's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Vec<f32>,
}

impl FeatureRow {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f32> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// Debug signal so we can confirm we're not sending all-zeros.
    pub fn summary(&self) -> String {
        let v = &self.values;
        let nz = v.iter().filter(|x| **x != 0.0).count();
        let mean = if v.is_empty() { 0.0 } else { v.iter().sum::<f32>() / (v.len() as f32) };
        let std = if v.len() < 2 {
            0.0
        } else {
            (v.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / (v.len() as f32)).sqrt()
        };
        let sample: Vec<String> = self
            .columns
            .iter()
            .zip(v)
            .take(6)
            .map(|(name, x)| format!("{}={:.3}", name, x))
            .collect();
        format!(
            "in_dim={} nonzero={} mean={:.3} std={:.3} sample=[{}]",
            v.len(),
            nz,
            mean,
            std,
            sample.join(", ")
        )
    }
}

pub fn indicator_column(field: &str, label: &str) -> String {
    format!("{}_{}", field, label)
}

/// Single-row one-hot expansion: numeric fields by name, plus one indicator
/// per categorical field for the value actually present.
pub fn expand(profile: &PassengerProfile) -> HashMap<String, f32> {
    let mut m = HashMap::with_capacity(24);
    m.insert("age".to_string(), profile.age as f32);
    m.insert("flight_distance".to_string(), profile.flight_distance as f32);
    for (name, r) in profile.ratings.columns() {
        m.insert(name.to_string(), f32::from(r.stars()));
    }
    m.insert(
        "departure_delay_in_minutes".to_string(),
        profile.departure_delay_minutes as f32,
    );
    m.insert(
        "arrival_delay_in_minutes".to_string(),
        profile.arrival_delay_minutes as f32,
    );

    let [ct, tt, cl] = CATEGORICAL_FIELDS;
    m.insert(indicator_column(ct, profile.customer_type.label()), 1.0);
    m.insert(indicator_column(tt, profile.type_of_travel.label()), 1.0);
    m.insert(indicator_column(cl, profile.class.label()), 1.0);
    m
}

/// Reindex onto the authoritative column order; missing columns become 0,
/// columns the model does not know are dropped.
pub fn align(map: &HashMap<String, f32>, feat_list: &[String]) -> FeatureRow {
    let mut values = Vec::with_capacity(feat_list.len());
    for k in feat_list {
        values.push(*map.get(k).unwrap_or(&0.0));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        let mut dropped: Vec<&String> = map.keys().filter(|k| !feat_list.contains(*k)).collect();
        if !dropped.is_empty() {
            dropped.sort();
            tracing::debug!("columns not expected by the model were dropped: {:?}", dropped);
        }
    }

    FeatureRow {
        columns: feat_list.to_vec(),
        values,
    }
}

pub fn build_row(profile: &PassengerProfile, feat_list: &[String]) -> FeatureRow {
    align(&expand(profile), feat_list)
}

#![allow(dead_code)]

use std::{fs, path::PathBuf};

use satisfaction_predictor::config::Config;
use serde_json::json;

pub const CLASSES: [&str; 2] = ["neutral or dissatisfied", "satisfied"];

pub fn feature_names() -> Vec<String> {
    [
        "age",
        "flight_distance",
        "seat_comfort",
        "departure_arrival_time_convenient",
        "food_and_drink",
        "gate_location",
        "inflight_wifi_service",
        "inflight_entertainment",
        "online_support",
        "ease_of_online_booking",
        "on-board_service",
        "leg_room_service",
        "baggage_handling",
        "checkin_service",
        "cleanliness",
        "departure_delay_in_minutes",
        "arrival_delay_in_minutes",
        "customer_type_Disloyal Customer",
        "customer_type_Loyal Customer",
        "type_of_travel_Business travel",
        "type_of_travel_Personal Travel",
        "class_Business",
        "class_Eco",
        "class_Eco Plus",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Splits on inflight entertainment (index 7), then on personal travel (index 20).
pub fn tree_json() -> String {
    json!({
        "feature_names_in": feature_names(),
        "classes": CLASSES,
        "nodes": [
            {"feature": 7, "threshold": 3.5, "left": 1, "right": 4, "value": [500, 500]},
            {"feature": 20, "threshold": 0.5, "left": 2, "right": 3, "value": [400, 100]},
            {"feature": -2, "threshold": -2.0, "left": -1, "right": -1, "value": [300, 100]},
            {"feature": -2, "threshold": -2.0, "left": -1, "right": -1, "value": [100, 0]},
            {"feature": -2, "threshold": -2.0, "left": -1, "right": -1, "value": [100, 400]}
        ]
    })
    .to_string()
}

/// 1000 rows, 600 of them loyal customers.
pub fn population_csv() -> String {
    let mut s = String::from("id,customer_type,age,type_of_travel,class,flight_distance,satisfaction\n");
    for i in 0..1000 {
        let ct = if i < 600 { "Loyal Customer" } else { "Disloyal Customer" };
        let tt = if i % 4 == 0 { "Personal Travel" } else { "Business travel" };
        let class = ["Eco", "Eco Plus", "Business", "Business", "Eco"][i % 5];
        let age = 10 + (i % 60);
        let sat = CLASSES[i % 2];
        s.push_str(&format!("{},{},{},{},{},{},{}\n", i, ct, age, tt, class, 100 + i, sat));
    }
    s
}

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub config: Config,
}

pub fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let p = dir.path().join(name);
    fs::write(&p, body).unwrap();
    p
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let model = write(&dir, "decision_tree_airline.json", &tree_json());
    let data = write(&dir, "airline.csv", &population_csv());
    let config = Config {
        model_path: model.to_string_lossy().into_owned(),
        dataset_path: data.to_string_lossy().into_owned(),
        ..Config::default()
    };
    Fixture { dir, config }
}

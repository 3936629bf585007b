//! Survey layout served to the front-end, so the page never hard-codes
//! option labels or defaults that could drift from the profile types.

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{CustomerType, PassengerProfile, Rating, TravelClass, TypeOfTravel};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    Select { options: Vec<&'static str> },
    Number { min: u32 },
    Stars { min: u8, max: u8 },
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    /// JSON pointer into a `PassengerProfile`, e.g. `/ratings/seat_comfort`
    pub key: String,
    pub question: &'static str,
    #[serde(flatten)]
    pub widget: Widget,
    pub default: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub hint: &'static str,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSpec {
    pub title: &'static str,
    pub description: &'static str,
    pub sections: Vec<Section>,
}

const RATING_QUESTIONS: [(&str, &str); 13] = [
    ("seat_comfort", "How comfortable was the seat for the customer? (1-5 stars)"),
    ("departure_arrival_time_convenient", "Was the departure/arrival time convenient for the customer? (1-5 stars)"),
    ("food_and_drink", "How would the customer rate the food and drink? (1-5 stars)"),
    ("gate_location", "How would the customer rate the gate location? (1-5 stars)"),
    ("inflight_wifi_service", "How would the customer rate the inflight wifi service? (1-5 stars)"),
    ("inflight_entertainment", "How would the customer rate the inflight entertainment? (1-5 stars)"),
    ("online_support", "How would the customer rate online support? (1-5 stars)"),
    ("ease_of_online_booking", "How easy was online booking for the customer? (1-5 stars)"),
    ("on-board_service", "How would the customer rate the onboard service? (1-5 stars)"),
    ("leg_room_service", "How would the customer rate the leg room service? (1-5 stars)"),
    ("baggage_handling", "How would the customer rate baggage handling? (1-5 stars)"),
    ("checkin_service", "How would the customer rate the check-in service? (1-5 stars)"),
    ("cleanliness", "How would the customer rate cleanliness? (1-5 stars)"),
];

fn select(key: &str, question: &'static str, options: Vec<&'static str>, defaults: &Value) -> Field {
    field(key, question, Widget::Select { options }, defaults)
}

fn field(key: &str, question: &'static str, widget: Widget, defaults: &Value) -> Field {
    Field {
        key: key.to_string(),
        question,
        widget,
        default: defaults.pointer(key).cloned().unwrap_or(Value::Null),
    }
}

pub fn survey() -> FormSpec {
    let defaults = json!(PassengerProfile::default());

    let customer = vec![
        select(
            "/customer_type",
            "Customer Type",
            CustomerType::ALL.iter().map(|c| c.label()).collect(),
            &defaults,
        ),
        select(
            "/type_of_travel",
            "Is the customer travelling for business or personal reasons",
            TypeOfTravel::ALL.iter().map(|t| t.label()).collect(),
            &defaults,
        ),
        select(
            "/class",
            "Class",
            TravelClass::ALL.iter().map(|c| c.label()).collect(),
            &defaults,
        ),
        field("/age", "How old is the customer?", Widget::Number { min: 0 }, &defaults),
    ];

    let flight = vec![
        field(
            "/flight_distance",
            "How far is the customer flying in miles?",
            Widget::Number { min: 0 },
            &defaults,
        ),
        field(
            "/departure_delay_minutes",
            "How many minutes was the customer's departure delayed? (Enter 0 if not delayed)",
            Widget::Number { min: 0 },
            &defaults,
        ),
        field(
            "/arrival_delay_minutes",
            "How many minutes was the customer's arrival delayed? (Enter 0 if not delayed)",
            Widget::Number { min: 0 },
            &defaults,
        ),
    ];

    let experience = RATING_QUESTIONS
        .iter()
        .map(|&(col, q)| {
            field(
                &format!("/ratings/{}", col),
                q,
                Widget::Stars {
                    min: Rating::MIN,
                    max: Rating::MAX,
                },
                &defaults,
            )
        })
        .collect();

    FormSpec {
        title: "Airline Satisfaction Prediction",
        description: "Gain insights into passenger experiences and improve satisfaction through data analysis and surveys.",
        sections: vec![
            Section {
                title: "Part 1: Customer Details",
                hint: "Provide information on the customer flying.",
                fields: customer,
            },
            Section {
                title: "Part 2: Flight Details",
                hint: "Provide details about the customer's flight details.",
                fields: flight,
            },
            Section {
                title: "Part 3: Customer Experience",
                hint: "Provide details about the customer's flight experience and satisfaction.",
                fields: experience,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServiceRatings;

    #[test]
    fn every_key_resolves_in_a_profile() {
        let profile = json!(PassengerProfile::default());
        let spec = survey();
        let mut n = 0;
        for s in &spec.sections {
            for f in &s.fields {
                assert!(profile.pointer(&f.key).is_some(), "dangling key {}", f.key);
                assert!(!f.default.is_null(), "no default for {}", f.key);
                n += 1;
            }
        }
        assert_eq!(n, 7 + ServiceRatings::COUNT);
    }

    #[test]
    fn rating_questions_cover_every_rating_column() {
        let cols: Vec<&str> = ServiceRatings::default().columns().iter().map(|(c, _)| *c).collect();
        let asked: Vec<&str> = RATING_QUESTIONS.iter().map(|(c, _)| *c).collect();
        assert_eq!(cols, asked);
    }

    #[test]
    fn widgets_serialize_with_kind_tag() {
        let spec = serde_json::to_value(survey()).unwrap();
        let first = &spec["sections"][0]["fields"][0];
        assert_eq!(first["kind"], "select");
        assert_eq!(first["options"][1], "Disloyal Customer");
        assert_eq!(first["default"], "Loyal Customer");
        let star = &spec["sections"][2]["fields"][0];
        assert_eq!(star["kind"], "stars");
        assert_eq!(star["max"], 5);
    }
}

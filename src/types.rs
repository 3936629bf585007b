use serde::{Deserialize, Serialize};

use crate::error::SatisfactionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    #[serde(rename = "Loyal Customer")]
    Loyal,
    #[serde(rename = "Disloyal Customer")]
    Disloyal,
}

impl CustomerType {
    pub const ALL: [CustomerType; 2] = [CustomerType::Loyal, CustomerType::Disloyal];

    pub fn label(self) -> &'static str {
        match self {
            CustomerType::Loyal => "Loyal Customer",
            CustomerType::Disloyal => "Disloyal Customer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeOfTravel {
    #[serde(rename = "Business travel")]
    Business,
    #[serde(rename = "Personal Travel")]
    Personal,
}

impl TypeOfTravel {
    pub const ALL: [TypeOfTravel; 2] = [TypeOfTravel::Business, TypeOfTravel::Personal];

    pub fn label(self) -> &'static str {
        match self {
            TypeOfTravel::Business => "Business travel",
            TypeOfTravel::Personal => "Personal Travel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelClass {
    #[serde(rename = "Eco")]
    Eco,
    #[serde(rename = "Eco Plus")]
    EcoPlus,
    #[serde(rename = "Business")]
    Business,
}

impl TravelClass {
    pub const ALL: [TravelClass; 3] = [TravelClass::Eco, TravelClass::EcoPlus, TravelClass::Business];

    pub fn label(self) -> &'static str {
        match self {
            TravelClass::Eco => "Eco",
            TravelClass::EcoPlus => "Eco Plus",
            TravelClass::Business => "Business",
        }
    }
}

/// A 1-5 star answer. Construction outside the range is rejected, so a
/// profile that deserialised successfully always carries valid ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, SatisfactionError> {
        if (Self::MIN..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(SatisfactionError::InvalidProfile(format!(
                "rating {} outside {}-{}",
                stars,
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for Rating {
    type Error = SatisfactionError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Rating::new(v)
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.0
    }
}

// Keys double as the model's column names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceRatings {
    pub seat_comfort: Rating,
    pub departure_arrival_time_convenient: Rating,
    pub food_and_drink: Rating,
    pub gate_location: Rating,
    pub inflight_wifi_service: Rating,
    pub inflight_entertainment: Rating,
    pub online_support: Rating,
    pub ease_of_online_booking: Rating,
    #[serde(rename = "on-board_service")]
    pub on_board_service: Rating,
    pub leg_room_service: Rating,
    pub baggage_handling: Rating,
    pub checkin_service: Rating,
    pub cleanliness: Rating,
}

impl ServiceRatings {
    pub const COUNT: usize = 13;

    /// Same rating on every question.
    pub fn uniform(r: Rating) -> Self {
        Self {
            seat_comfort: r,
            departure_arrival_time_convenient: r,
            food_and_drink: r,
            gate_location: r,
            inflight_wifi_service: r,
            inflight_entertainment: r,
            online_support: r,
            ease_of_online_booking: r,
            on_board_service: r,
            leg_room_service: r,
            baggage_handling: r,
            checkin_service: r,
            cleanliness: r,
        }
    }

    /// (column name, rating) in survey order.
    pub fn columns(&self) -> [(&'static str, Rating); Self::COUNT] {
        [
            ("seat_comfort", self.seat_comfort),
            ("departure_arrival_time_convenient", self.departure_arrival_time_convenient),
            ("food_and_drink", self.food_and_drink),
            ("gate_location", self.gate_location),
            ("inflight_wifi_service", self.inflight_wifi_service),
            ("inflight_entertainment", self.inflight_entertainment),
            ("online_support", self.online_support),
            ("ease_of_online_booking", self.ease_of_online_booking),
            ("on-board_service", self.on_board_service),
            ("leg_room_service", self.leg_room_service),
            ("baggage_handling", self.baggage_handling),
            ("checkin_service", self.checkin_service),
            ("cleanliness", self.cleanliness),
        ]
    }
}

/// One survey submission. Never mutated once built; a changed form yields a new profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassengerProfile {
    pub customer_type: CustomerType,
    pub type_of_travel: TypeOfTravel,
    pub class: TravelClass,
    pub age: u32,
    pub flight_distance: u32,
    pub departure_delay_minutes: u32,
    pub arrival_delay_minutes: u32,
    pub ratings: ServiceRatings,
}

impl Default for PassengerProfile {
    // Initial form state.
    fn default() -> Self {
        Self {
            customer_type: CustomerType::Loyal,
            type_of_travel: TypeOfTravel::Business,
            class: TravelClass::Eco,
            age: 25,
            flight_distance: 50,
            departure_delay_minutes: 0,
            arrival_delay_minutes: 0,
            ratings: ServiceRatings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_category: String,
    /// 0-100, one decimal place.
    pub confidence_percentage: f64,
}

/// Round to one decimal place, ties to even.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        for s in 1..=5 {
            assert_eq!(Rating::new(s).unwrap().stars(), s);
        }
    }

    #[test]
    fn profile_json_uses_display_labels() {
        let p = PassengerProfile::default();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["customer_type"], "Loyal Customer");
        assert_eq!(v["type_of_travel"], "Business travel");
        assert_eq!(v["class"], "Eco");
        assert_eq!(v["ratings"]["on-board_service"], 1);
    }

    #[test]
    fn out_of_range_rating_is_rejected_on_deserialize() {
        let mut v = serde_json::to_value(PassengerProfile::default()).unwrap();
        v["ratings"]["cleanliness"] = serde_json::json!(7);
        let err = serde_json::from_value::<PassengerProfile>(v).unwrap_err();
        assert!(err.to_string().contains("outside 1-5"), "{}", err);
    }

    #[test]
    fn negative_age_is_rejected_on_deserialize() {
        let mut v = serde_json::to_value(PassengerProfile::default()).unwrap();
        v["age"] = serde_json::json!(-3);
        assert!(serde_json::from_value::<PassengerProfile>(v).is_err());
    }

    #[test]
    fn labels_match_serde_names() {
        for c in CustomerType::ALL {
            assert_eq!(serde_json::to_value(c).unwrap(), c.label());
        }
        for t in TypeOfTravel::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), t.label());
        }
        for c in TravelClass::ALL {
            assert_eq!(serde_json::to_value(c).unwrap(), c.label());
        }
    }

    #[test]
    fn round1_matches_one_decimal() {
        assert_eq!(round1(60.0), 60.0);
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        // exact ties go to the even digit
        assert_eq!(round1(6.25), 6.2);
        assert_eq!(round1(0.75), 0.8);
    }
}

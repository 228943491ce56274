//! Train model
//!
//! Trains run between an origin and a destination station. Only active trains
//! accept bookings; the booking function rejects the rest.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Train service category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrainType {
    Superfast,
    #[default]
    Express,
    Passenger,
    Rajdhani,
    Shatabdi,
    Duronto,
    #[serde(rename = "Vande Bharat", alias = "VandeBharat")]
    VandeBharat,
    #[serde(rename = "Garib Rath", alias = "GaribRath")]
    GaribRath,
    Other,
}

impl fmt::Display for TrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrainType::Superfast => "Superfast",
            TrainType::Express => "Express",
            TrainType::Passenger => "Passenger",
            TrainType::Rajdhani => "Rajdhani",
            TrainType::Shatabdi => "Shatabdi",
            TrainType::Duronto => "Duronto",
            TrainType::VandeBharat => "Vande Bharat",
            TrainType::GaribRath => "Garib Rath",
            TrainType::Other => "Other",
        };
        f.write_str(label)
    }
}

impl TrainType {
    /// Parse from string (case-insensitive, ignores spaces and underscores)
    pub fn from_str(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "superfast" => Some(TrainType::Superfast),
            "express" => Some(TrainType::Express),
            "passenger" => Some(TrainType::Passenger),
            "rajdhani" => Some(TrainType::Rajdhani),
            "shatabdi" => Some(TrainType::Shatabdi),
            "duronto" => Some(TrainType::Duronto),
            "vandebharat" => Some(TrainType::VandeBharat),
            "garibrath" => Some(TrainType::GaribRath),
            "other" => Some(TrainType::Other),
            _ => None,
        }
    }
}

/// Train entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    pub id: i32,

    /// Public train number (e.g. "12951")
    pub train_number: String,

    pub train_name: String,

    pub train_type: TrainType,

    pub origin_station_id: i32,

    pub destination_station_id: i32,

    /// Route length in kilometres
    pub total_distance: i32,

    /// Inactive trains are kept for history but cannot be booked
    pub is_active: bool,
}

impl Train {
    /// Check whether the route endpoints are distinct stations
    pub fn has_valid_route(&self) -> bool {
        self.origin_station_id != self.destination_station_id && self.total_distance > 0
    }
}

/// Train listing row with resolved station names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainSummary {
    pub id: i32,
    pub train_number: String,
    pub train_name: String,
    pub train_type: TrainType,
    pub origin: String,
    pub destination: String,
    pub total_distance: i32,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_type_parsing() {
        assert_eq!(TrainType::from_str("Vande Bharat"), Some(TrainType::VandeBharat));
        assert_eq!(TrainType::from_str("garib_rath"), Some(TrainType::GaribRath));
        assert_eq!(TrainType::from_str("RAJDHANI"), Some(TrainType::Rajdhani));
        assert_eq!(TrainType::from_str("Bullet"), None);
    }

    #[test]
    fn test_train_type_display_parses_back() {
        for t in [
            TrainType::Superfast,
            TrainType::VandeBharat,
            TrainType::GaribRath,
            TrainType::Other,
        ] {
            assert_eq!(TrainType::from_str(&t.to_string()), Some(t));
        }
    }

    #[test]
    fn test_route_validity() {
        let mut train = Train {
            id: 3,
            train_number: "12951".to_string(),
            train_name: "Mumbai Rajdhani".to_string(),
            train_type: TrainType::Rajdhani,
            origin_station_id: 1,
            destination_station_id: 2,
            total_distance: 1384,
            is_active: true,
        };
        assert!(train.has_valid_route());

        train.destination_station_id = 1;
        assert!(!train.has_valid_route());
    }
}

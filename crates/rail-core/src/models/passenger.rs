//! Passenger model
//!
//! Passengers are the people tickets are booked for. Age, gender and the
//! disability flag feed the concession rules of the fare function and the
//! demographics report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Passenger gender as captured at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "Prefer not to say", alias = "PreferNotToSay")]
    PreferNotToSay,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
            Gender::PreferNotToSay => write!(f, "Prefer not to say"),
        }
    }
}

impl Gender {
    /// Parse from string (case-insensitive, spaces or underscores)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "prefer not to say" => Some(Gender::PreferNotToSay),
            _ => None,
        }
    }
}

/// Age buckets used by the demographics report, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "Under 18")]
    Under18,
    #[serde(rename = "18-30")]
    From18To30,
    #[serde(rename = "31-45")]
    From31To45,
    #[serde(rename = "46-60")]
    From46To60,
    #[serde(rename = "Over 60")]
    Over60,
}

impl AgeGroup {
    /// All buckets in display order
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Under18,
        AgeGroup::From18To30,
        AgeGroup::From31To45,
        AgeGroup::From46To60,
        AgeGroup::Over60,
    ];

    /// Bucket for an age in years
    pub fn from_age(age: i32) -> Self {
        match age {
            a if a < 18 => AgeGroup::Under18,
            18..=30 => AgeGroup::From18To30,
            31..=45 => AgeGroup::From31To45,
            46..=60 => AgeGroup::From46To60,
            _ => AgeGroup::Over60,
        }
    }

    /// Display label, identical to the SQL bucket label
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under18 => "Under 18",
            AgeGroup::From18To30 => "18-30",
            AgeGroup::From31To45 => "31-45",
            AgeGroup::From46To60 => "46-60",
            AgeGroup::Over60 => "Over 60",
        }
    }

    /// Parse a bucket label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label.trim())
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Passenger entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    /// Unique identifier
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    /// Age in years
    pub age: i32,

    pub gender: Gender,

    pub email: Option<String>,

    pub phone: Option<String>,

    /// Whether the passenger qualifies for the disability concession
    pub disability: bool,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl Passenger {
    /// First and last name joined by a space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Demographics bucket for this passenger
    pub fn age_group(&self) -> AgeGroup {
        AgeGroup::from_age(self.age)
    }
}

impl Default for Passenger {
    fn default() -> Self {
        Self {
            id: 0,
            first_name: String::new(),
            last_name: String::new(),
            age: 0,
            gender: Gender::Other,
            email: None,
            phone: None,
            disability: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parsing() {
        assert_eq!(Gender::from_str("male"), Some(Gender::Male));
        assert_eq!(Gender::from_str("FEMALE"), Some(Gender::Female));
        assert_eq!(
            Gender::from_str("prefer_not_to_say"),
            Some(Gender::PreferNotToSay)
        );
        assert_eq!(
            Gender::from_str("Prefer not to say"),
            Some(Gender::PreferNotToSay)
        );
        assert_eq!(Gender::from_str("unknown"), None);
    }

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age(17), AgeGroup::Under18);
        assert_eq!(AgeGroup::from_age(18), AgeGroup::From18To30);
        assert_eq!(AgeGroup::from_age(30), AgeGroup::From18To30);
        assert_eq!(AgeGroup::from_age(31), AgeGroup::From31To45);
        assert_eq!(AgeGroup::from_age(60), AgeGroup::From46To60);
        assert_eq!(AgeGroup::from_age(61), AgeGroup::Over60);
    }

    #[test]
    fn test_age_group_labels_round_trip() {
        for group in AgeGroup::ALL {
            assert_eq!(AgeGroup::from_label(group.label()), Some(group));
        }
        assert_eq!(AgeGroup::from_label("60+"), None);
    }

    #[test]
    fn test_full_name() {
        let p = Passenger {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            age: 34,
            ..Default::default()
        };
        assert_eq!(p.full_name(), "Asha Rao");
        assert_eq!(p.age_group(), AgeGroup::From31To45);
    }
}

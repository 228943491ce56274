//! Passenger DTOs
//!
//! Request and response types for passenger management endpoints.

use chrono::{DateTime, Utc};
use rail_core::models::{Gender, Passenger};
use rail_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Passenger create/update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PassengerRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    /// Age in years
    #[validate(range(min = 0, max = 150))]
    pub age: i32,

    /// Male, Female, Other or "Prefer not to say"
    pub gender: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 15))]
    pub phone: Option<String>,

    #[serde(default)]
    pub disability: bool,
}

impl PassengerRequest {
    /// Convert to a Passenger entity with the given id
    pub fn to_passenger(&self, id: i32) -> AppResult<Passenger> {
        let gender = Gender::from_str(&self.gender)
            .ok_or_else(|| AppError::Validation(format!("unknown gender '{}'", self.gender)))?;

        Ok(Passenger {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            age: self.age,
            gender,
            email: blank_to_none(self.email.as_deref()),
            phone: blank_to_none(self.phone.as_deref()),
            disability: self.disability,
            created_at: Utc::now(),
        })
    }
}

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Passenger search parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassengerSearchParams {
    /// Fragment of the first or last name
    pub name: Option<String>,
}

/// Passenger response
#[derive(Debug, Clone, Serialize)]
pub struct PassengerResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub age: i32,
    pub age_group: String,
    pub gender: Gender,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub disability: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Passenger> for PassengerResponse {
    fn from(p: Passenger) -> Self {
        Self {
            full_name: p.full_name(),
            age_group: p.age_group().to_string(),
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            age: p.age,
            gender: p.gender,
            email: p.email,
            phone: p.phone,
            disability: p.disability,
            created_at: p.created_at,
        }
    }
}

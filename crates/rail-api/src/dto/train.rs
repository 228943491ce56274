//! Train and reference data DTOs

use rail_core::models::{FareClass, Station, Train, TrainType};
use rail_core::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Train create/update request
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_route"))]
pub struct TrainRequest {
    #[validate(length(min = 1, max = 10, message = "Train number is required"))]
    pub train_number: String,

    #[validate(length(min = 1, max = 100, message = "Train name is required"))]
    pub train_name: String,

    /// Service category, e.g. "Rajdhani" or "Vande Bharat"
    #[serde(default = "default_train_type")]
    pub train_type: String,

    #[validate(range(min = 1))]
    pub origin_station_id: i32,

    #[validate(range(min = 1))]
    pub destination_station_id: i32,

    /// Route length in kilometres
    #[validate(range(min = 1, message = "Distance must be positive"))]
    pub total_distance: i32,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_train_type() -> String {
    "Express".to_string()
}

fn default_active() -> bool {
    true
}

fn validate_route(req: &TrainRequest) -> Result<(), ValidationError> {
    if req.origin_station_id == req.destination_station_id {
        let mut err = ValidationError::new("same_station");
        err.message = Some("Origin and destination must differ".into());
        return Err(err);
    }
    Ok(())
}

impl TrainRequest {
    /// Convert to a Train entity with the given id
    pub fn to_train(&self, id: i32) -> AppResult<Train> {
        let train_type = TrainType::from_str(&self.train_type).ok_or_else(|| {
            AppError::Validation(format!("unknown train type '{}'", self.train_type))
        })?;

        Ok(Train {
            id,
            train_number: self.train_number.trim().to_string(),
            train_name: self.train_name.trim().to_string(),
            train_type,
            origin_station_id: self.origin_station_id,
            destination_station_id: self.destination_station_id,
            total_distance: self.total_distance,
            is_active: self.is_active,
        })
    }
}

/// Train search parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainSearchParams {
    /// Fragment of the train number or name
    pub q: Option<String>,
}

/// Station response
#[derive(Debug, Clone, Serialize)]
pub struct StationResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
}

impl From<Station> for StationResponse {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            code: s.station_code,
            name: s.station_name,
        }
    }
}

/// Fare class response
#[derive(Debug, Clone, Serialize)]
pub struct FareClassResponse {
    pub class_name: String,
    pub fare_per_km: Decimal,
    pub seat_capacity: i32,
    pub seats_per_coach: i32,
    pub coach_prefix: String,
}

impl From<FareClass> for FareClassResponse {
    fn from(c: FareClass) -> Self {
        Self {
            class_name: c.class_name,
            fare_per_km: c.fare_per_km,
            seat_capacity: c.seat_capacity,
            seats_per_coach: c.seats_per_coach,
            coach_prefix: c.coach_prefix,
        }
    }
}

//! Fare class model
//!
//! Travel classes (Sleeper, AC 3 Tier, ...) with the tariff and capacity
//! inputs consumed by the booking and fare functions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Travel class offered on trains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareClass {
    /// Class name as referenced by tickets (e.g. "Sleeper")
    pub class_name: String,

    /// Base tariff per kilometre
    pub fare_per_km: Decimal,

    /// Seats available per train and journey date
    pub seat_capacity: i32,

    /// Seats per coach, used to derive the coach number
    pub seats_per_coach: i32,

    /// Coach label prefix (e.g. "S" for Sleeper, "B" for AC 3 Tier)
    pub coach_prefix: String,
}

impl FareClass {
    /// Case-insensitive comparison against a requested class name
    pub fn matches(&self, name: &str) -> bool {
        self.class_name.eq_ignore_ascii_case(name.trim())
    }
}

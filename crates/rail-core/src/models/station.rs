//! Station model

use serde::{Deserialize, Serialize};

/// Railway station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: i32,
    /// Short station code (e.g. "NDLS")
    pub station_code: String,
    pub station_name: String,
}

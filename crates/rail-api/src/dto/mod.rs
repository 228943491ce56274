//! Data Transfer Objects (DTOs) for API requests and responses

pub mod common;
pub mod passenger;
pub mod payment;
pub mod report;
pub mod ticket;
pub mod train;

pub use common::*;
pub use passenger::*;
pub use payment::*;
pub use report::*;
pub use ticket::*;
pub use train::*;

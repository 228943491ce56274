//! HTTP request handlers

pub mod health;
pub mod passenger;
pub mod payment;
pub mod reference;
pub mod report;
pub mod ticket;
pub mod train;

pub use health::configure as configure_health;
pub use passenger::configure as configure_passengers;
pub use payment::configure as configure_payments;
pub use reference::configure as configure_reference;
pub use report::configure as configure_reports;
pub use ticket::configure as configure_tickets;
pub use train::configure as configure_trains;

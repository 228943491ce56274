//! DTO conversion and validation tests

use rail_api::dto::{
    FareClassResponse, PassengerRequest, PassengerResponse, PaymentFilterParams, ReportParams,
    TicketFilterParams, TrainRequest,
};
use rail_core::models::{
    FareClass, Gender, PaymentStatus, ReportKind, TicketFilter, TrainType,
};
use rail_core::AppError;
use rust_decimal_macros::dec;
use validator::Validate;

fn passenger_request() -> PassengerRequest {
    PassengerRequest {
        first_name: " Asha ".to_string(),
        last_name: "Rao".to_string(),
        age: 67,
        gender: "Female".to_string(),
        email: Some("asha.rao@example.com".to_string()),
        phone: Some("".to_string()),
        disability: false,
    }
}

#[test]
fn test_passenger_request_conversion() {
    let req = passenger_request();
    assert!(req.validate().is_ok());

    let passenger = req.to_passenger(7).unwrap();
    assert_eq!(passenger.id, 7);
    assert_eq!(passenger.first_name, "Asha");
    assert_eq!(passenger.gender, Gender::Female);
    assert_eq!(passenger.phone, None);

    let response = PassengerResponse::from(passenger);
    assert_eq!(response.full_name, "Asha Rao");
    assert_eq!(response.age_group, "Over 60");
}

#[test]
fn test_passenger_request_rejects_bad_input() {
    let mut req = passenger_request();
    req.age = 151;
    assert!(req.validate().is_err());

    let mut req = passenger_request();
    req.email = Some("not-an-email".to_string());
    assert!(req.validate().is_err());

    let mut req = passenger_request();
    req.first_name = String::new();
    assert!(req.validate().is_err());

    let mut req = passenger_request();
    req.gender = "unknown".to_string();
    assert!(matches!(req.to_passenger(0), Err(AppError::Validation(_))));
}

fn train_request() -> TrainRequest {
    TrainRequest {
        train_number: "12951".to_string(),
        train_name: "Mumbai Rajdhani".to_string(),
        train_type: "Rajdhani".to_string(),
        origin_station_id: 1,
        destination_station_id: 2,
        total_distance: 1384,
        is_active: true,
    }
}

#[test]
fn test_train_request_conversion() {
    let req = train_request();
    assert!(req.validate().is_ok());

    let train = req.to_train(3).unwrap();
    assert_eq!(train.id, 3);
    assert_eq!(train.train_type, TrainType::Rajdhani);
    assert!(train.has_valid_route());
}

#[test]
fn test_train_request_rejects_bad_route() {
    let mut req = train_request();
    req.destination_station_id = req.origin_station_id;
    assert!(req.validate().is_err());

    let mut req = train_request();
    req.total_distance = 0;
    assert!(req.validate().is_err());

    let mut req = train_request();
    req.train_type = "Hyperloop".to_string();
    assert!(req.to_train(0).is_err());
}

#[test]
fn test_ticket_filter_params_drop_blanks() {
    let filter = TicketFilter::from(TicketFilterParams {
        pnr: Some("  ".to_string()),
        passenger_name: Some(" Rao ".to_string()),
        from: None,
        to: None,
    });

    assert_eq!(filter.pnr, None);
    assert_eq!(filter.passenger_name.as_deref(), Some("Rao"));
}

#[test]
fn test_payment_filter_status() {
    let all = PaymentFilterParams {
        status: Some("All".to_string()),
        ..Default::default()
    };
    assert_eq!(all.to_filter().unwrap().status, None);

    let refunded = PaymentFilterParams {
        status: Some("refunded".to_string()),
        ..Default::default()
    };
    assert_eq!(
        refunded.to_filter().unwrap().status,
        Some(PaymentStatus::Refunded)
    );

    let bogus = PaymentFilterParams {
        status: Some("Bounced".to_string()),
        ..Default::default()
    };
    assert!(matches!(bogus.to_filter(), Err(AppError::Validation(_))));
}

#[test]
fn test_report_params() {
    let params: ReportParams =
        serde_json::from_str(r#"{"kind": "Revenue by Class", "from": "2024-05-01", "to": "2024-05-31"}"#)
            .unwrap();
    assert_eq!(params.kind().unwrap(), ReportKind::RevenueByClass);
    assert_eq!(params.range().unwrap().unwrap().days(), 31);

    let params: ReportParams =
        serde_json::from_str(r#"{"kind": "weekly", "from": "2024-05-01"}"#).unwrap();
    assert!(params.kind().is_err());
    assert!(params.range().is_err());
}

#[test]
fn test_fare_class_response() {
    let response = FareClassResponse::from(FareClass {
        class_name: "Sleeper".to_string(),
        fare_per_km: dec!(0.60),
        seat_capacity: 72,
        seats_per_coach: 72,
        coach_prefix: "S".to_string(),
    });

    assert_eq!(response.class_name, "Sleeper");
    assert_eq!(response.fare_per_km, dec!(0.60));
}

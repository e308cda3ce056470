use chrono::NaiveDate;
use condo_portal::models::{
    Administrator, Announcement, CreateIncidentRequest, CreateReservationRequest, LoginResponse,
    LoginUser, PaymentWebhookPayload, PixCharge, RegisterResidentRequest, Reservation, Resident,
    UpdateUnitRequest,
};
use serde_json::{Value, json};
use uuid::Uuid;

// --- Serialization Guard Tests ---

#[test]
fn test_resident_never_serializes_password_hash() {
    let resident = Resident {
        id: Uuid::new_v4(),
        name: "Maria Souza".to_string(),
        email: "maria@example.com".to_string(),
        password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        ..Resident::default()
    };

    let serialized = serde_json::to_string(&resident).unwrap();

    assert!(!serialized.contains("password_hash"));
    assert!(!serialized.contains("$2b$12$"));
    assert!(serialized.contains("maria@example.com"));
}

#[test]
fn test_administrator_never_serializes_password_hash() {
    let admin = Administrator {
        id: Uuid::new_v4(),
        name: "Front Desk".to_string(),
        email: "desk@example.com".to_string(),
        password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        ..Administrator::default()
    };

    let serialized = serde_json::to_string(&admin).unwrap();

    assert!(!serialized.contains("password_hash"));
}

#[test]
fn test_resident_deserializes_without_password_hash() {
    // API clients never send the hash; the field must default.
    let payload = json!({
        "id": Uuid::new_v4(),
        "name": "Maria Souza",
        "email": "maria@example.com",
        "phone": null,
        "unit_id": null,
        "created_at": "2026-01-15T12:00:00Z"
    });

    let resident: Resident = serde_json::from_value(payload).unwrap();

    assert_eq!(resident.password_hash, "");
    assert_eq!(resident.name, "Maria Souza");
}

// --- Request Payload Shape Tests ---

#[test]
fn test_register_request_optional_fields() {
    let minimal = json!({
        "name": "João Lima",
        "email": "joao@example.com",
        "password": "hunter22"
    });

    let req: RegisterResidentRequest = serde_json::from_value(minimal).unwrap();

    assert!(req.phone.is_none());
    assert!(req.unit_id.is_none());
}

#[test]
fn test_update_unit_request_omits_unset_fields() {
    let req = UpdateUnitRequest {
        number: Some("305".to_string()),
        block: None,
        floor: None,
    };

    let value: Value = serde_json::to_value(&req).unwrap();
    let obj = value.as_object().unwrap();

    // Unset fields must be absent entirely, not serialized as null, so the
    // repository's COALESCE semantics stay visible in the wire format.
    assert_eq!(obj.len(), 1);
    assert_eq!(obj["number"], "305");
}

#[test]
fn test_incident_request_with_custom_category() {
    let payload = json!({
        "category": "other",
        "custom_category": "Pipe burst in garage",
        "description": "Water leaking near parking spot 14",
        "occurred_at": "2026-03-02T08:30:00Z"
    });

    let req: CreateIncidentRequest = serde_json::from_value(payload).unwrap();

    assert_eq!(req.category, "other");
    assert_eq!(req.custom_category.as_deref(), Some("Pipe burst in garage"));
    assert!(req.location.is_none());
}

#[test]
fn test_reservation_request_date_format() {
    let payload = json!({
        "space_name": "Barbecue Area",
        "reservation_date": "2026-09-12"
    });

    let req: CreateReservationRequest = serde_json::from_value(payload).unwrap();

    assert_eq!(
        req.reservation_date,
        NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
    );
}

#[test]
fn test_webhook_payload_deserialization() {
    // The exact body shape the gateway POSTs to /webhooks/payment.
    let raw = r#"{"charge_id":"ch_9f3b21","status":"approved"}"#;

    let payload: PaymentWebhookPayload = serde_json::from_str(raw).unwrap();

    assert_eq!(payload.charge_id, "ch_9f3b21");
    assert_eq!(payload.status, "approved");
}

// --- Response Shape Tests ---

#[test]
fn test_login_response_shape() {
    let response = LoginResponse {
        access_token: "header.payload.signature".to_string(),
        user: LoginUser {
            name: "Maria Souza".to_string(),
            role: "resident".to_string(),
        },
    };

    let value: Value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["access_token"], "header.payload.signature");
    assert_eq!(value["user"]["name"], "Maria Souza");
    assert_eq!(value["user"]["role"], "resident");
}

#[test]
fn test_pix_charge_serialization() {
    let charge = PixCharge {
        charge_id: "ch_123".to_string(),
        qr_code: "00020126...".to_string(),
        qr_code_image: None,
        amount_cents: 5000,
    };

    let value: Value = serde_json::to_value(&charge).unwrap();

    assert_eq!(value["charge_id"], "ch_123");
    assert_eq!(value["amount_cents"], 5000);
    assert!(value["qr_code_image"].is_null());
}

#[test]
fn test_reservation_serializes_date_as_plain_string() {
    let reservation = Reservation {
        id: Uuid::new_v4(),
        space_name: "Party Hall".to_string(),
        reservation_date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
        status: "pending".to_string(),
        ..Reservation::default()
    };

    let value: Value = serde_json::to_value(&reservation).unwrap();

    assert_eq!(value["reservation_date"], "2026-09-12");
    assert_eq!(value["status"], "pending");
    assert!(value["charge_id"].is_null());
}

#[test]
fn test_announcement_default_is_unexpired() {
    let announcement = Announcement::default();

    let value: Value = serde_json::to_value(&announcement).unwrap();

    assert!(value["expires_at"].is_null());
    assert!(value["created_by"].is_null());
}

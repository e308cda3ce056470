use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Unit
///
/// A single apartment/unit of the condominium, stored in `units`.
/// Residents and packages reference units via nullable foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Unit {
    pub id: Uuid,
    /// Human-facing unit label (e.g. "204"). Unique across the condominium.
    pub number: String,
    pub block: Option<String>,
    pub floor: Option<i32>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Resident
///
/// A resident account stored in `residents`. The bcrypt `password_hash` is
/// never serialized into API responses or exported TypeScript bindings.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Resident {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    #[schema(ignore)]
    pub password_hash: String,
    pub phone: Option<String>,
    // FK to units.id, ON DELETE SET NULL.
    pub unit_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Administrator
///
/// A staff account stored in `administrators`. Administrators are provisioned
/// out-of-band (seed/ops); there is no public admin registration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Administrator {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    #[schema(ignore)]
    pub password_hash: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Visitor
///
/// A visitor authorization logged by a resident: who may enter, on which date,
/// and with which vehicle (if any). The `document` (CPF) is unique so the same
/// person cannot be pre-authorized twice.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Visitor {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    #[ts(type = "string")]
    pub visit_date: NaiveDate,
    pub has_vehicle: bool,
    pub vehicle_plate: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_color: Option<String>,
    pub observations: Option<String>,
    // The releasing resident. FK ON DELETE SET NULL, so the gate log survives
    // account deletion.
    pub resident_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Incident
///
/// An incident report filed by a resident. Status is either "open" or
/// "resolved"; new reports always start open.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Incident {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub location: Option<String>,
    #[ts(type = "string")]
    pub occurred_at: DateTime<Utc>,
    pub status: String,
    pub resident_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Reservation
///
/// A shared-space reservation. Rows begin as "pending" and are flipped to
/// "approved" or "denied" by the payment webhook (or a manual admin override).
/// The `(space_name, reservation_date)` pair is unique; that constraint is the
/// only guard against two residents racing for the same slot.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Reservation {
    pub id: Uuid,
    pub space_name: String,
    #[ts(type = "string")]
    pub reservation_date: NaiveDate,
    pub status: String,
    /// Charge identifier returned by the payment gateway. Set right after the
    /// charge is created; the webhook correlates on this value.
    pub charge_id: Option<String>,
    pub resident_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Package
///
/// A delivery registered at the front desk for a resident. Status is
/// "pending" until an administrator marks it "picked_up".
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Package {
    pub id: Uuid,
    pub carrier: Option<String>,
    pub description: Option<String>,
    pub status: String,
    // Recipient. FK ON DELETE CASCADE: a package row is meaningless without one.
    pub resident_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    #[ts(type = "string")]
    pub received_at: DateTime<Utc>,
    #[ts(type = "string | null")]
    pub picked_up_at: Option<DateTime<Utc>>,
}

/// Announcement
///
/// A notice published by an administrator. Residents only see announcements
/// whose `expires_at` is NULL or in the future.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// "normal" | "high" | "urgent"
    pub priority: String,
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// IncidentSummary
///
/// One row of the open-incident summary: a category and how many open
/// incidents it currently has. Produced by a GROUP BY query.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct IncidentSummary {
    pub category: String,
    pub count: i64,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterResidentRequest
///
/// Input payload for resident self-registration (POST /register).
/// The password is bcrypt-hashed before it ever touches the database.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterResidentRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub unit_id: Option<Uuid>,
}

/// LoginRequest
///
/// Credentials for POST /login. The same endpoint serves residents and
/// administrators; the issued token carries the resolved role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreateUnitRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateUnitRequest {
    pub number: String,
    pub block: Option<String>,
    pub floor: Option<i32>,
}

/// UpdateUnitRequest
///
/// Partial update payload for PUT /admin/units/{id}. All fields optional;
/// omitted fields keep their current value (COALESCE in the repository).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUnitRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
}

/// CreateVisitorRequest
///
/// Input payload for logging a visitor authorization (POST /visitors).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateVisitorRequest {
    pub name: String,
    /// CPF of the visitor. Must be unique across all authorizations.
    pub document: String,
    #[ts(type = "string")]
    pub visit_date: NaiveDate,
    pub has_vehicle: bool,
    pub vehicle_plate: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_color: Option<String>,
    pub observations: Option<String>,
}

/// CreateIncidentRequest
///
/// Input payload for POST /incidents. When `category` is "other" the
/// free-text `custom_category` replaces it, mirroring the portal UI that
/// offers a fixed category list plus an "other" escape hatch.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateIncidentRequest {
    pub category: String,
    pub custom_category: Option<String>,
    pub description: String,
    pub location: Option<String>,
    #[ts(type = "string")]
    pub occurred_at: DateTime<Utc>,
}

/// CreateReservationRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateReservationRequest {
    pub space_name: String,
    #[ts(type = "string")]
    pub reservation_date: NaiveDate,
}

/// RegisterPackageRequest
///
/// Input payload for registering a delivery at the front desk
/// (POST /admin/packages).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterPackageRequest {
    pub resident_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub carrier: Option<String>,
    pub description: Option<String>,
}

/// CreateAnnouncementRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub body: String,
    /// Defaults to "normal" when omitted.
    pub priority: Option<String>,
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// UpdateStatusRequest
///
/// Generic status-flip payload used by the admin incident and reservation
/// status endpoints. Allowed values are validated per endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PaymentWebhookPayload
///
/// Inbound callback body from the payment gateway (POST /webhooks/payment).
/// `status` is the gateway's verdict for the charge: "approved", "rejected"
/// or "cancelled".
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PaymentWebhookPayload {
    pub charge_id: String,
    pub status: String,
}

// --- Response Schemas (Output) ---

/// LoginUser
///
/// The user block embedded in the login response; the portal frontend greets
/// the user by name immediately after login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginUser {
    pub name: String,
    pub role: String,
}

/// LoginResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoginUser,
}

/// ResidentProfile
///
/// Output schema for GET /me: the resident row enriched with the unit number
/// via a LEFT JOIN (NULL when the resident has no unit assigned).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ResidentProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub unit_id: Option<Uuid>,
    // Loaded via the LEFT JOIN with units.
    #[sqlx(default)]
    pub unit_number: Option<String>,
}

/// PixCharge
///
/// The QR payload handed back to the client after a reservation is created.
/// `qr_code` is the PIX copy-and-paste string; `qr_code_image` is an optional
/// base64 PNG rendered by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PixCharge {
    pub charge_id: String,
    pub qr_code: String,
    pub qr_code_image: Option<String>,
    pub amount_cents: i64,
}

/// ReservationCreatedResponse
///
/// Output of POST /reservations: the pending reservation row plus the payment
/// charge the resident must settle to confirm it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReservationCreatedResponse {
    pub reservation: Reservation,
    pub payment: PixCharge,
}

/// AdminDashboardStats
///
/// Output schema for the administrative dashboard (GET /admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_residents: i64,
    pub total_units: i64,
    pub open_incidents: i64,
    pub pending_reservations: i64,
    pub pending_packages: i64,
}

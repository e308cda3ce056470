use crate::{
    AppState,
    auth::{self, AuthUser},
    models::{
        AdminDashboardStats, Announcement, CreateAnnouncementRequest, CreateIncidentRequest,
        CreateReservationRequest, CreateUnitRequest, CreateVisitorRequest, Incident,
        IncidentSummary, LoginRequest, LoginResponse, LoginUser, Package, PaymentWebhookPayload,
        RegisterPackageRequest, RegisterResidentRequest, Reservation, ReservationCreatedResponse,
        Resident, ResidentProfile, Unit, UpdateStatusRequest, UpdateUnitRequest, Visitor,
    },
    repository::RepoError,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use subtle::ConstantTimeEq;
use uuid::Uuid;

// --- Authentication Handlers ---

/// register_resident
///
/// [Public Route] Resident self-registration.
///
/// *Flow*: Rejects blank mandatory fields (400) and duplicate emails (409),
/// bcrypt-hashes the password, and inserts the account. The stored hash is
/// never serialized back to the client.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterResidentRequest,
    responses(
        (status = 201, description = "Registered", body = Resident),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_resident(
    State(state): State<AppState>,
    Json(payload): Json<RegisterResidentRequest>,
) -> Result<(StatusCode, Json<Resident>), StatusCode> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Early duplicate check for a friendly 409; the unique index still backs
    // this up against races.
    if state
        .repo
        .get_resident_by_email(&payload.email)
        .await
        .is_some()
    {
        return Err(StatusCode::CONFLICT);
    }

    let password_hash =
        auth::hash_password(&payload.password).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match state.repo.create_resident(payload, password_hash).await {
        Ok(resident) => Ok((StatusCode::CREATED, Json(resident))),
        Err(RepoError::Conflict) => Err(StatusCode::CONFLICT),
        Err(RepoError::InvalidReference) => Err(StatusCode::BAD_REQUEST),
        Err(RepoError::Database) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// login
///
/// [Public Route] Issues a bearer token for a resident or administrator.
///
/// *Resolution order*: residents first, administrators second; the issued
/// token's role claim records which table matched. Bad credentials and
/// unknown emails are indistinguishable (401) by design.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let (id, name, role, hash) = if let Some(resident) =
        state.repo.get_resident_by_email(&payload.email).await
    {
        (
            resident.id,
            resident.name,
            "resident",
            resident.password_hash,
        )
    } else if let Some(admin) = state.repo.get_administrator_by_email(&payload.email).await {
        (admin.id, admin.name, "admin", admin.password_hash)
    } else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if !auth::verify_password(&payload.password, &hash) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let access_token = auth::issue_token(id, role, &state.config.jwt_secret).map_err(|e| {
        tracing::error!("token issuance failed: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(LoginResponse {
        access_token,
        user: LoginUser {
            name,
            role: role.to_string(),
        },
    }))
}

/// get_me
///
/// [Authenticated Route] The resident's own profile, enriched with the unit
/// number. Staff accounts have no unit and no profile here (403).
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = ResidentProfile),
        (status = 403, description = "Not a resident account")
    )
)]
pub async fn get_me(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ResidentProfile>, StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.get_resident_profile(id).await {
        Some(profile) => Ok(Json(profile)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// --- Visitor Handlers ---

/// add_visitor
///
/// [Authenticated Route] Logs a visitor authorization for the requesting
/// resident. The visitor's CPF is unique across the condominium; a repeat
/// authorization answers 409.
#[utoipa::path(
    post,
    path = "/visitors",
    request_body = CreateVisitorRequest,
    responses(
        (status = 201, description = "Visitor logged", body = Visitor),
        (status = 409, description = "Document already authorized")
    )
)]
pub async fn add_visitor(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateVisitorRequest>,
) -> Result<(StatusCode, Json<Visitor>), StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.name.trim().is_empty() || payload.document.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.repo.create_visitor(payload, id).await {
        Ok(visitor) => Ok((StatusCode::CREATED, Json(visitor))),
        Err(RepoError::Conflict) => Err(StatusCode::CONFLICT),
        Err(RepoError::InvalidReference) => Err(StatusCode::BAD_REQUEST),
        Err(RepoError::Database) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// get_my_visitors
///
/// [Authenticated Route] Lists the visitors the requesting resident has
/// authorized, newest visit first.
#[utoipa::path(
    get,
    path = "/me/visitors",
    responses((status = 200, description = "My visitors", body = [Visitor]))
)]
pub async fn get_my_visitors(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Visitor>>, StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_my_visitors(id).await))
}

// --- Incident Handlers ---

/// add_incident
///
/// [Authenticated Route] Files an incident report.
///
/// When the category is "other", the free-text `custom_category` replaces it,
/// so the stored category is always the effective label.
#[utoipa::path(
    post,
    path = "/incidents",
    request_body = CreateIncidentRequest,
    responses(
        (status = 201, description = "Incident reported", body = Incident),
        (status = 400, description = "Missing fields")
    )
)]
pub async fn add_incident(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(mut payload): Json<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<Incident>), StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.category.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    if payload.category == "other" {
        if let Some(custom) = payload.custom_category.take() {
            if !custom.trim().is_empty() {
                payload.category = custom;
            }
        }
    }

    match state.repo.create_incident(payload, id).await {
        Ok(incident) => Ok((StatusCode::CREATED, Json(incident))),
        Err(RepoError::InvalidReference) => Err(StatusCode::BAD_REQUEST),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// get_my_incidents
///
/// [Authenticated Route] Lists the requesting resident's own reports.
#[utoipa::path(
    get,
    path = "/me/incidents",
    responses((status = 200, description = "My incidents", body = [Incident]))
)]
pub async fn get_my_incidents(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Incident>>, StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_my_incidents(id).await))
}

/// get_incident_summary
///
/// [Authenticated Route] Open incidents grouped by category, busiest category
/// first. Visible to residents and administrators alike.
#[utoipa::path(
    get,
    path = "/incidents/summary",
    responses((status = 200, description = "Open incident counts", body = [IncidentSummary]))
)]
pub async fn get_incident_summary(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<IncidentSummary>> {
    Json(state.repo.get_incident_summary().await)
}

// --- Reservation Handlers ---

/// create_reservation
///
/// [Authenticated Route] The pay-to-confirm saga, step by step:
/// 1. Insert the pending reservation; the composite unique constraint on
///    (space_name, reservation_date) answers 409 to the loser of a race.
/// 2. Create a PIX charge at the gateway for the configured fee.
/// 3. Persist the charge id so the webhook can correlate the callback.
///
/// A gateway failure answers 502 and leaves the pending row in place; there is
/// deliberately no compensating transaction. The reservation stays pending
/// until the asynchronous webhook approves or denies it.
#[utoipa::path(
    post,
    path = "/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Pending reservation + payment QR", body = ReservationCreatedResponse),
        (status = 409, description = "Space already reserved for that date"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn create_reservation(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationCreatedResponse>), StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.space_name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let reservation = match state.repo.create_reservation(payload, id).await {
        Ok(r) => r,
        Err(RepoError::Conflict) => return Err(StatusCode::CONFLICT),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    };

    let description = format!(
        "Reservation fee: {} on {}",
        reservation.space_name, reservation.reservation_date
    );

    let charge = state
        .payments
        .create_charge(
            reservation.id,
            state.config.reservation_fee_cents,
            &description,
        )
        .await
        .map_err(|e| {
            tracing::error!("charge creation failed for {}: {}", reservation.id, e);
            StatusCode::BAD_GATEWAY
        })?;

    if !state
        .repo
        .attach_charge(reservation.id, &charge.charge_id)
        .await
    {
        // The charge exists at the gateway but the correlation was lost; the
        // webhook for it will answer 404 and the reservation stays pending.
        tracing::error!(
            "failed to attach charge {} to reservation {}",
            charge.charge_id,
            reservation.id
        );
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let reservation = Reservation {
        charge_id: Some(charge.charge_id.clone()),
        ..reservation
    };

    Ok((
        StatusCode::CREATED,
        Json(ReservationCreatedResponse {
            reservation,
            payment: charge,
        }),
    ))
}

/// get_my_reservations
///
/// [Authenticated Route] The requesting resident's reservations, newest date
/// first, pending and settled alike.
#[utoipa::path(
    get,
    path = "/me/reservations",
    responses((status = 200, description = "My reservations", body = [Reservation]))
)]
pub async fn get_my_reservations(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Reservation>>, StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_my_reservations(id).await))
}

/// payment_webhook
///
/// [Public Route] Inbound callback from the payment gateway, the asynchronous
/// half of the reservation saga.
///
/// *Security*: The gateway is configured to send the shared secret in the
/// `x-webhook-token` header; anything else is 401. The payload's `status`
/// decides the reservation's fate: approved confirms it, rejected/cancelled
/// denies it. Unknown charge ids (or repeats for settled charges) answer 404.
#[utoipa::path(
    post,
    path = "/webhooks/payment",
    request_body = PaymentWebhookPayload,
    responses(
        (status = 200, description = "Reservation settled", body = Reservation),
        (status = 400, description = "Unknown gateway status"),
        (status = 401, description = "Bad webhook token"),
        (status = 404, description = "No pending reservation for charge")
    )
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PaymentWebhookPayload>,
) -> Result<Json<Reservation>, StatusCode> {
    let token = headers
        .get("x-webhook-token")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    // Constant-time comparison; this is the one endpoint guarded by a shared
    // secret instead of a signed token.
    let token_ok: bool = token
        .as_bytes()
        .ct_eq(state.config.payment_webhook_token.as_bytes())
        .into();
    if !token_ok {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let outcome = match payload.status.as_str() {
        "approved" => "approved",
        "rejected" | "cancelled" => "denied",
        other => {
            tracing::warn!("webhook with unknown status '{}'", other);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state
        .repo
        .settle_reservation_by_charge(&payload.charge_id, outcome)
        .await
    {
        Some(reservation) => {
            tracing::info!(
                "reservation {} settled as {} via charge {}",
                reservation.id,
                outcome,
                payload.charge_id
            );
            Ok(Json(reservation))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

// --- Package Handlers ---

/// get_my_packages
///
/// [Authenticated Route] The requesting resident's packages, pending first.
#[utoipa::path(
    get,
    path = "/me/packages",
    responses((status = 200, description = "My packages", body = [Package]))
)]
pub async fn get_my_packages(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Package>>, StatusCode> {
    if role != "resident" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_my_packages(id).await))
}

// --- Announcement Handlers ---

/// get_announcements
///
/// [Authenticated Route] Active (unexpired) announcements, urgent first.
#[utoipa::path(
    get,
    path = "/announcements",
    responses((status = 200, description = "Active announcements", body = [Announcement]))
)]
pub async fn get_announcements(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<Announcement>> {
    Json(state.repo.list_active_announcements().await)
}

// --- Admin Handlers ---

/// get_admin_stats
///
/// [Admin Route] Core dashboard counters.
///
/// *Authorization*: Explicitly checks that the `role` resolved by `AuthUser` is "admin".
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_stats().await))
}

/// create_unit
///
/// [Admin Route] Registers a unit. Unit numbers are unique (409 on repeat).
#[utoipa::path(
    post,
    path = "/admin/units",
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Created", body = Unit),
        (status = 409, description = "Unit number taken")
    )
)]
pub async fn create_unit(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUnitRequest>,
) -> Result<(StatusCode, Json<Unit>), StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.number.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    match state.repo.create_unit(payload).await {
        Ok(unit) => Ok((StatusCode::CREATED, Json(unit))),
        Err(RepoError::Conflict) => Err(StatusCode::CONFLICT),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// list_units
#[utoipa::path(
    get,
    path = "/admin/units",
    responses((status = 200, description = "All units", body = [Unit]))
)]
pub async fn list_units(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Unit>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_units().await))
}

/// update_unit
///
/// [Admin Route] Partial update; omitted fields keep their current value.
/// Renaming a unit onto another unit's number answers 409, same as creation.
#[utoipa::path(
    put,
    path = "/admin/units/{id}",
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = UpdateUnitRequest,
    responses(
        (status = 200, description = "Updated", body = Unit),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Unit number taken")
    )
)]
pub async fn update_unit(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUnitRequest>,
) -> Result<Json<Unit>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.update_unit(id, payload).await {
        Ok(Some(unit)) => Ok(Json(unit)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(RepoError::Conflict) => Err(StatusCode::CONFLICT),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// delete_unit
///
/// [Admin Route] Removes a unit. Residents keep their accounts; their
/// `unit_id` is nulled by the FK's ON DELETE SET NULL.
#[utoipa::path(
    delete,
    path = "/admin/units/{id}",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_unit(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if role != "admin" {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_unit(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// list_residents
#[utoipa::path(
    get,
    path = "/admin/residents",
    responses((status = 200, description = "All residents", body = [Resident]))
)]
pub async fn list_residents(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Resident>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_residents().await))
}

/// list_visitors
///
/// [Admin Route] The full visitor log, across all residents.
#[utoipa::path(
    get,
    path = "/admin/visitors",
    responses((status = 200, description = "All visitors", body = [Visitor]))
)]
pub async fn list_visitors(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Visitor>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_visitors().await))
}

/// list_incidents
///
/// [Admin Route] All incident reports, open ones first.
#[utoipa::path(
    get,
    path = "/admin/incidents",
    responses((status = 200, description = "All incidents", body = [Incident]))
)]
pub async fn list_incidents(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Incident>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_incidents().await))
}

/// update_incident_status
///
/// [Admin Route] Flips an incident between "open" and "resolved".
#[utoipa::path(
    put,
    path = "/admin/incidents/{id}/status",
    params(("id" = Uuid, Path, description = "Incident ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Incident),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_incident_status(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Incident>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.status != "open" && payload.status != "resolved" {
        return Err(StatusCode::BAD_REQUEST);
    }
    match state.repo.set_incident_status(id, &payload.status).await {
        Some(incident) => Ok(Json(incident)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// list_reservations
#[utoipa::path(
    get,
    path = "/admin/reservations",
    responses((status = 200, description = "All reservations", body = [Reservation]))
)]
pub async fn list_reservations(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Reservation>>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_reservations().await))
}

/// update_reservation_status
///
/// [Admin Route] Manual override of a reservation's status, for when the
/// payment flow needs human intervention (e.g. a fee settled at the desk).
#[utoipa::path(
    put,
    path = "/admin/reservations/{id}/status",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Reservation),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_reservation_status(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Reservation>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    if !matches!(payload.status.as_str(), "pending" | "approved" | "denied") {
        return Err(StatusCode::BAD_REQUEST);
    }
    match state.repo.set_reservation_status(id, &payload.status).await {
        Some(reservation) => Ok(Json(reservation)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// register_package
///
/// [Admin Route] Registers a delivery at the front desk for a resident.
/// An unknown resident or unit id answers 400 (FK violation).
#[utoipa::path(
    post,
    path = "/admin/packages",
    request_body = RegisterPackageRequest,
    responses(
        (status = 201, description = "Registered", body = Package),
        (status = 400, description = "Unknown resident or unit")
    )
)]
pub async fn register_package(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RegisterPackageRequest>,
) -> Result<(StatusCode, Json<Package>), StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.register_package(payload).await {
        Ok(package) => Ok((StatusCode::CREATED, Json(package))),
        Err(RepoError::InvalidReference) => Err(StatusCode::BAD_REQUEST),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// mark_package_picked_up
///
/// [Admin Route] Flips a pending package to picked_up and stamps the time.
/// A second pickup attempt answers 409; an unknown id answers 404.
#[utoipa::path(
    put,
    path = "/admin/packages/{id}/pickup",
    params(("id" = Uuid, Path, description = "Package ID")),
    responses(
        (status = 200, description = "Picked up", body = Package),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already picked up")
    )
)]
pub async fn mark_package_picked_up(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Package>, StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    if let Some(package) = state.repo.mark_package_picked_up(id).await {
        return Ok(Json(package));
    }
    // The update matched nothing: either the row is gone (404) or it was
    // already picked up (409).
    match state.repo.get_package(id).await {
        Some(_) => Err(StatusCode::CONFLICT),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// create_announcement
#[utoipa::path(
    post,
    path = "/admin/announcements",
    request_body = CreateAnnouncementRequest,
    responses(
        (status = 201, description = "Published", body = Announcement),
        (status = 400, description = "Missing fields or bad priority")
    )
)]
pub async fn create_announcement(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>), StatusCode> {
    if role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.title.trim().is_empty() || payload.body.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if let Some(ref priority) = payload.priority {
        if !matches!(priority.as_str(), "normal" | "high" | "urgent") {
            return Err(StatusCode::BAD_REQUEST);
        }
    }
    match state.repo.create_announcement(payload, id).await {
        Ok(announcement) => Ok((StatusCode::CREATED, Json(announcement))),
        Err(RepoError::InvalidReference) => Err(StatusCode::BAD_REQUEST),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// delete_announcement
#[utoipa::path(
    delete,
    path = "/admin/announcements/{id}",
    params(("id" = Uuid, Path, description = "Announcement ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_announcement(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if role != "admin" {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_announcement(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

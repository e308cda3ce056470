use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any account that has successfully passed the
/// authentication layer. This module implements all core features for a resident:
/// visitor logging, incident reporting, shared-space reservations, package and
/// announcement visibility.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware being
/// present on the router layer above this module. This guarantees that all handlers
/// receive a validated `AuthUser` struct containing the account's ID and role.
/// Resident-scoped handlers additionally reject staff accounts (403), since rows
/// they create reference `residents.id`.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // Retrieves the currently authenticated resident's profile, including
        // the unit number via a LEFT JOIN.
        .route("/me", get(handlers::get_me))
        // --- Visitor Logging ---
        // POST /visitors
        // Pre-authorizes a visitor (name, CPF, date, optional vehicle).
        // The CPF unique index answers 409 on a repeated authorization.
        .route("/visitors", post(handlers::add_visitor))
        // GET /me/visitors
        // Lists the visitors this resident has authorized, newest visit first.
        .route("/me/visitors", get(handlers::get_my_visitors))
        // --- Incident Reporting ---
        // POST /incidents
        // Files an incident report. "other" + custom_category collapses into
        // the effective category label before storage.
        .route("/incidents", post(handlers::add_incident))
        // GET /me/incidents
        .route("/me/incidents", get(handlers::get_my_incidents))
        // GET /incidents/summary
        // Open incidents grouped by category; shared with administrators.
        .route("/incidents/summary", get(handlers::get_incident_summary))
        // --- Reservations (pay-to-confirm) ---
        // POST /reservations
        // Step one of the saga: pending row + PIX charge + QR payload.
        // The webhook on the public router performs the asynchronous step two.
        .route("/reservations", post(handlers::create_reservation))
        // GET /me/reservations
        .route("/me/reservations", get(handlers::get_my_reservations))
        // --- Packages ---
        // GET /me/packages
        // The resident's deliveries, pending first. Registration and pickup
        // are front-desk (admin) operations.
        .route("/me/packages", get(handlers::get_my_packages))
        // --- Announcements ---
        // GET /announcements
        // Active (unexpired) notices, urgent first.
        .route("/announcements", get(handlers::get_announcements))
}

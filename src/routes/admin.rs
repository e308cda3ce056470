use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to accounts with the 'admin' role:
/// condominium oversight (stats, full logs), unit management, front-desk package
/// handling, announcement publishing, and manual status overrides.
///
/// Access Control:
/// This entire router is nested under '/admin' and wrapped in the authentication
/// middleware; each handler then explicitly checks for `role == "admin"` before
/// touching the repository. This prevents any unauthorized access to moderation
/// and management functions.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Dashboard counters: residents, units, open incidents, pending
        // reservations and packages.
        .route("/stats", get(handlers::get_admin_stats))
        // --- Units ---
        // POST/GET /admin/units, PUT/DELETE /admin/units/{id}
        // Unit numbers are unique; deleting a unit nulls residents' unit_id.
        .route(
            "/units",
            post(handlers::create_unit).get(handlers::list_units),
        )
        .route(
            "/units/{id}",
            put(handlers::update_unit).delete(handlers::delete_unit),
        )
        // GET /admin/residents
        .route("/residents", get(handlers::list_residents))
        // GET /admin/visitors
        // The full gate log, across all residents.
        .route("/visitors", get(handlers::list_visitors))
        // --- Incidents ---
        // GET /admin/incidents, PUT /admin/incidents/{id}/status
        // Status flips between "open" and "resolved".
        .route("/incidents", get(handlers::list_incidents))
        .route(
            "/incidents/{id}/status",
            put(handlers::update_incident_status),
        )
        // --- Reservations ---
        // GET /admin/reservations, PUT /admin/reservations/{id}/status
        // The status override exists for out-of-band settlements (fee paid at
        // the desk) and cleanup of abandoned pending rows.
        .route("/reservations", get(handlers::list_reservations))
        .route(
            "/reservations/{id}/status",
            put(handlers::update_reservation_status),
        )
        // --- Packages ---
        // POST /admin/packages, PUT /admin/packages/{id}/pickup
        .route("/packages", post(handlers::register_package))
        .route(
            "/packages/{id}/pickup",
            put(handlers::mark_package_picked_up),
        )
        // --- Announcements ---
        // POST /admin/announcements, DELETE /admin/announcements/{id}
        .route("/announcements", post(handlers::create_announcement))
        .route(
            "/announcements/{id}",
            delete(handlers::delete_announcement),
        )
}

use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// These are the identity gateway (register/login), the liveness probe, and
/// the payment gateway's callback.
///
/// Security Mandate:
/// The webhook is not anonymous in practice: the handler rejects any request
/// missing the shared `x-webhook-token` secret. It lives here because the
/// gateway cannot carry a portal bearer token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /register
        // Resident self-registration: hashes the password and creates the account.
        // Duplicate emails answer 409.
        .route("/register", post(handlers::register_resident))
        // POST /login
        // Issues the bearer token consumed by every authenticated route.
        // Serves both residents and administrators; the token records the role.
        .route("/login", post(handlers::login))
        // POST /webhooks/payment
        // Asynchronous confirmation/denial of pending reservations by the
        // payment gateway. Authenticated by the shared webhook token header.
        .route("/webhooks/payment", post(handlers::payment_webhook))
}

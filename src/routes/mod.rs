/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing a Defense-in-Depth strategy. This structure ensures that
/// access control is applied explicitly at the module level (via Axum layers),
/// preventing accidental exposure of protected endpoints.
///
/// The three modules map directly to the defined access roles.

/// Routes accessible without a session: registration, login, health,
/// and the payment gateway's webhook (guarded by its own shared secret).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated resident or administrator session.
pub mod authenticated;

/// Routes restricted exclusively to accounts with the 'admin' role.
/// Implements mandatory authorization checks.
pub mod admin;

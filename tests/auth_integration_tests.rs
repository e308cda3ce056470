use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use condo_portal::{
    AppState,
    auth::{self, AuthUser, Claims},
    config::Env,
    models::{
        AdminDashboardStats, Administrator, Announcement, CreateAnnouncementRequest,
        CreateIncidentRequest, CreateReservationRequest, CreateUnitRequest, CreateVisitorRequest,
        Incident, IncidentSummary, Package, RegisterPackageRequest, RegisterResidentRequest,
        Reservation, Resident, ResidentProfile, Unit, UpdateUnitRequest, Visitor,
    },
    payment::MockPaymentService,
    repository::{RepoError, Repository},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Mock Repository for Auth Logic ---

#[derive(Default)]
struct MockAuthRepo {
    resident_to_return: Option<Resident>,
    admin_to_return: Option<Administrator>,
}

#[async_trait]
impl Repository for MockAuthRepo {
    async fn get_resident(&self, _id: Uuid) -> Option<Resident> {
        self.resident_to_return.clone()
    }
    async fn get_administrator(&self, _id: Uuid) -> Option<Administrator> {
        self.admin_to_return.clone()
    }
    // Placeholder implementations for the rest of the trait surface; the auth
    // extractor only touches the two lookups above.
    async fn get_resident_by_email(&self, _email: &str) -> Option<Resident> {
        self.resident_to_return.clone()
    }
    async fn create_resident(
        &self,
        _req: RegisterResidentRequest,
        _password_hash: String,
    ) -> Result<Resident, RepoError> {
        Ok(Resident::default())
    }
    async fn get_resident_profile(&self, _id: Uuid) -> Option<ResidentProfile> {
        None
    }
    async fn list_residents(&self) -> Vec<Resident> {
        vec![]
    }
    async fn get_administrator_by_email(&self, _email: &str) -> Option<Administrator> {
        self.admin_to_return.clone()
    }
    async fn create_unit(&self, _req: CreateUnitRequest) -> Result<Unit, RepoError> {
        Ok(Unit::default())
    }
    async fn list_units(&self) -> Vec<Unit> {
        vec![]
    }
    async fn update_unit(
        &self,
        _id: Uuid,
        _req: UpdateUnitRequest,
    ) -> Result<Option<Unit>, RepoError> {
        Ok(None)
    }
    async fn delete_unit(&self, _id: Uuid) -> bool {
        false
    }
    async fn create_visitor(
        &self,
        _req: CreateVisitorRequest,
        _resident_id: Uuid,
    ) -> Result<Visitor, RepoError> {
        Ok(Visitor::default())
    }
    async fn get_my_visitors(&self, _resident_id: Uuid) -> Vec<Visitor> {
        vec![]
    }
    async fn list_visitors(&self) -> Vec<Visitor> {
        vec![]
    }
    async fn create_incident(
        &self,
        _req: CreateIncidentRequest,
        _resident_id: Uuid,
    ) -> Result<Incident, RepoError> {
        Ok(Incident::default())
    }
    async fn get_my_incidents(&self, _resident_id: Uuid) -> Vec<Incident> {
        vec![]
    }
    async fn list_incidents(&self) -> Vec<Incident> {
        vec![]
    }
    async fn set_incident_status(&self, _id: Uuid, _status: &str) -> Option<Incident> {
        None
    }
    async fn get_incident_summary(&self) -> Vec<IncidentSummary> {
        vec![]
    }
    async fn create_reservation(
        &self,
        _req: CreateReservationRequest,
        _resident_id: Uuid,
    ) -> Result<Reservation, RepoError> {
        Ok(Reservation::default())
    }
    async fn attach_charge(&self, _reservation_id: Uuid, _charge_id: &str) -> bool {
        false
    }
    async fn settle_reservation_by_charge(
        &self,
        _charge_id: &str,
        _status: &str,
    ) -> Option<Reservation> {
        None
    }
    async fn get_my_reservations(&self, _resident_id: Uuid) -> Vec<Reservation> {
        vec![]
    }
    async fn list_reservations(&self) -> Vec<Reservation> {
        vec![]
    }
    async fn set_reservation_status(&self, _id: Uuid, _status: &str) -> Option<Reservation> {
        None
    }
    async fn register_package(&self, _req: RegisterPackageRequest) -> Result<Package, RepoError> {
        Ok(Package::default())
    }
    async fn get_package(&self, _id: Uuid) -> Option<Package> {
        None
    }
    async fn get_my_packages(&self, _resident_id: Uuid) -> Vec<Package> {
        vec![]
    }
    async fn mark_package_picked_up(&self, _id: Uuid) -> Option<Package> {
        None
    }
    async fn create_announcement(
        &self,
        _req: CreateAnnouncementRequest,
        _admin_id: Uuid,
    ) -> Result<Announcement, RepoError> {
        Ok(Announcement::default())
    }
    async fn list_active_announcements(&self) -> Vec<Announcement> {
        vec![]
    }
    async fn delete_announcement(&self, _id: Uuid) -> bool {
        false
    }
    async fn get_stats(&self) -> AdminDashboardStats {
        AdminDashboardStats::default()
    }
}

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn create_token(account_id: Uuid, role: &str, exp_offset: u64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let claims = Claims {
        sub: account_id,
        role: role.to_string(),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env, repo: MockAuthRepo, jwt_secret: String) -> AppState {
    let mut config = condo_portal::config::AppConfig::default();
    config.env = env;
    config.jwt_secret = jwt_secret;

    AppState {
        repo: Arc::new(repo),
        payments: Arc::new(MockPaymentService::new()),
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn test_resident(id: Uuid) -> Resident {
    Resident {
        id,
        name: "Test Resident".to_string(),
        email: "resident@example.com".to_string(),
        ..Resident::default()
    }
}

fn test_admin(id: Uuid) -> Administrator {
    Administrator {
        id,
        name: "Test Admin".to_string(),
        email: "admin@example.com".to_string(),
        ..Administrator::default()
    }
}

// --- Extractor Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_resident_jwt() {
    let token = create_token(TEST_USER_ID, "resident", 3600);

    let mock_repo = MockAuthRepo {
        resident_to_return: Some(test_resident(TEST_USER_ID)),
        ..MockAuthRepo::default()
    };
    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, TEST_USER_ID);
    assert_eq!(user.role, "resident");
}

#[tokio::test]
async fn test_auth_success_with_valid_admin_jwt() {
    let token = create_token(TEST_USER_ID, "admin", 3600);

    let mock_repo = MockAuthRepo {
        admin_to_return: Some(test_admin(TEST_USER_ID)),
        ..MockAuthRepo::default()
    };
    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    assert_eq!(auth_user.unwrap().role, "admin");
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_when_account_deleted_after_issuance() {
    // A structurally valid admin token, but no matching administrator row.
    let token = create_token(TEST_USER_ID, "admin", 3600);

    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_unknown_role_claim() {
    let token = create_token(TEST_USER_ID, "superuser", 3600);

    let mock_repo = MockAuthRepo {
        resident_to_return: Some(test_resident(TEST_USER_ID)),
        ..MockAuthRepo::default()
    };
    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
}

#[tokio::test]
async fn test_local_bypass_resolves_resident() {
    let mock_user_id = Uuid::new_v4();
    let mock_repo = MockAuthRepo {
        resident_to_return: Some(test_resident(mock_user_id)),
        ..MockAuthRepo::default()
    };
    let app_state = create_app_state(Env::Local, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, mock_user_id);
    assert_eq!(user.role, "resident");
}

#[tokio::test]
async fn test_local_bypass_resolves_admin_with_role_header() {
    let mock_user_id = Uuid::new_v4();
    let mock_repo = MockAuthRepo {
        admin_to_return: Some(test_admin(mock_user_id)),
        ..MockAuthRepo::default()
    };
    let app_state = create_app_state(Env::Local, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );
    parts.headers.insert(
        header::HeaderName::from_static("x-user-role"),
        header::HeaderValue::from_static("admin"),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    assert_eq!(auth_user.unwrap().role, "admin");
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let mock_user_id = Uuid::new_v4();
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // Provide ONLY the local bypass header
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

// --- Token Issuance & Password Tests ---

#[test]
fn test_issue_token_round_trip() {
    let account_id = Uuid::new_v4();
    let token = auth::issue_token(account_id, "resident", TEST_JWT_SECRET).unwrap();

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .expect("freshly issued token must validate");

    assert_eq!(decoded.claims.sub, account_id);
    assert_eq!(decoded.claims.role, "resident");
    assert!(decoded.claims.exp > decoded.claims.iat);
}

#[test]
fn test_issued_token_rejected_with_wrong_secret() {
    let token = auth::issue_token(Uuid::new_v4(), "admin", TEST_JWT_SECRET).unwrap();

    let result = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(b"a-completely-different-secret"),
        &Validation::default(),
    );

    assert!(result.is_err());
}

#[test]
fn test_password_hash_and_verify() {
    let hash = auth::hash_password("correct horse battery staple").unwrap();

    // The hash must not contain the plaintext.
    assert!(!hash.contains("correct horse"));
    assert!(auth::verify_password("correct horse battery staple", &hash));
    assert!(!auth::verify_password("wrong password", &hash));
}

#[test]
fn test_verify_password_with_malformed_hash() {
    // A garbage hash must fail verification, not panic.
    assert!(!auth::verify_password("anything", "not-a-bcrypt-hash"));
}

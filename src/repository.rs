use crate::models::{
    AdminDashboardStats, Administrator, Announcement, CreateAnnouncementRequest,
    CreateIncidentRequest, CreateReservationRequest, CreateUnitRequest, CreateVisitorRequest,
    Incident, IncidentSummary, Package, RegisterPackageRequest, RegisterResidentRequest,
    Reservation, Resident, ResidentProfile, Unit, UpdateUnitRequest, Visitor,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// RepoError
///
/// The failure taxonomy surfaced by repository write operations. Handlers map
/// these onto HTTP statuses: Conflict -> 409, InvalidReference -> 400,
/// Database -> 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoError {
    /// A unique constraint rejected the row (duplicate email, duplicate CPF,
    /// space/date already reserved, duplicate unit number).
    Conflict,
    /// A foreign key constraint rejected the row (e.g. a package registered
    /// for an unknown resident).
    InvalidReference,
    /// Any other database failure. Details are logged, not surfaced.
    Database,
}

/// Translates an sqlx error into the repository taxonomy, logging anything
/// that is not a constraint violation.
fn map_db_err(context: &str, e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return RepoError::Conflict;
        }
        if db.is_foreign_key_violation() {
            return RepoError::InvalidReference;
        }
    }
    tracing::error!("{} error: {:?}", context, e);
    RepoError::Database
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Accounts ---
    async fn get_resident(&self, id: Uuid) -> Option<Resident>;
    async fn get_resident_by_email(&self, email: &str) -> Option<Resident>;
    // The hash is produced by the handler; the plaintext never reaches this layer.
    async fn create_resident(
        &self,
        req: RegisterResidentRequest,
        password_hash: String,
    ) -> Result<Resident, RepoError>;
    // GET /me: resident enriched with the unit number.
    async fn get_resident_profile(&self, id: Uuid) -> Option<ResidentProfile>;
    async fn list_residents(&self) -> Vec<Resident>;
    async fn get_administrator(&self, id: Uuid) -> Option<Administrator>;
    async fn get_administrator_by_email(&self, email: &str) -> Option<Administrator>;

    // --- Units ---
    async fn create_unit(&self, req: CreateUnitRequest) -> Result<Unit, RepoError>;
    async fn list_units(&self) -> Vec<Unit>;
    // Partial update via COALESCE; Ok(None) when the unit does not exist,
    // Conflict when the new number collides with another unit's.
    async fn update_unit(&self, id: Uuid, req: UpdateUnitRequest)
    -> Result<Option<Unit>, RepoError>;
    async fn delete_unit(&self, id: Uuid) -> bool;

    // --- Visitors ---
    async fn create_visitor(
        &self,
        req: CreateVisitorRequest,
        resident_id: Uuid,
    ) -> Result<Visitor, RepoError>;
    async fn get_my_visitors(&self, resident_id: Uuid) -> Vec<Visitor>;
    async fn list_visitors(&self) -> Vec<Visitor>;

    // --- Incidents ---
    async fn create_incident(
        &self,
        req: CreateIncidentRequest,
        resident_id: Uuid,
    ) -> Result<Incident, RepoError>;
    async fn get_my_incidents(&self, resident_id: Uuid) -> Vec<Incident>;
    async fn list_incidents(&self) -> Vec<Incident>;
    async fn set_incident_status(&self, id: Uuid, status: &str) -> Option<Incident>;
    // Open incidents grouped by category, busiest category first.
    async fn get_incident_summary(&self) -> Vec<IncidentSummary>;

    // --- Reservations ---
    // Inserts the pending row; Conflict when the space/date slot is taken.
    async fn create_reservation(
        &self,
        req: CreateReservationRequest,
        resident_id: Uuid,
    ) -> Result<Reservation, RepoError>;
    // Records the gateway charge id on a freshly created reservation.
    async fn attach_charge(&self, reservation_id: Uuid, charge_id: &str) -> bool;
    // Webhook path: flips the reservation carrying this charge id.
    async fn settle_reservation_by_charge(
        &self,
        charge_id: &str,
        status: &str,
    ) -> Option<Reservation>;
    async fn get_my_reservations(&self, resident_id: Uuid) -> Vec<Reservation>;
    async fn list_reservations(&self) -> Vec<Reservation>;
    // Admin override of a reservation status.
    async fn set_reservation_status(&self, id: Uuid, status: &str) -> Option<Reservation>;

    // --- Packages ---
    async fn register_package(&self, req: RegisterPackageRequest) -> Result<Package, RepoError>;
    async fn get_package(&self, id: Uuid) -> Option<Package>;
    async fn get_my_packages(&self, resident_id: Uuid) -> Vec<Package>;
    // Flips pending -> picked_up and stamps picked_up_at. None when the row is
    // missing or already picked up (the handler disambiguates via get_package).
    async fn mark_package_picked_up(&self, id: Uuid) -> Option<Package>;

    // --- Announcements ---
    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
        admin_id: Uuid,
    ) -> Result<Announcement, RepoError>;
    // Resident view: unexpired announcements, urgent first.
    async fn list_active_announcements(&self) -> Vec<Announcement>;
    async fn delete_announcement(&self, id: Uuid) -> bool;

    // --- Dashboard ---
    async fn get_stats(&self) -> AdminDashboardStats;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RESIDENT_COLS: &str = "id, name, email, password_hash, phone, unit_id, created_at";
const RESERVATION_COLS: &str =
    "id, space_name, reservation_date, status, charge_id, resident_id, created_at";
const VISITOR_COLS: &str = "id, name, document, visit_date, has_vehicle, vehicle_plate, \
     vehicle_model, vehicle_color, observations, resident_id, created_at";
const PACKAGE_COLS: &str =
    "id, carrier, description, status, resident_id, unit_id, received_at, picked_up_at";

#[async_trait]
impl Repository for PostgresRepository {
    // --- Accounts ---

    /// get_resident
    ///
    /// Retrieves a resident row by primary key. Used by the auth extractor on
    /// every authenticated resident request.
    async fn get_resident(&self, id: Uuid) -> Option<Resident> {
        sqlx::query_as::<_, Resident>(&format!(
            "SELECT {RESIDENT_COLS} FROM residents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_resident error: {:?}", e);
            None
        })
    }

    async fn get_resident_by_email(&self, email: &str) -> Option<Resident> {
        sqlx::query_as::<_, Resident>(&format!(
            "SELECT {RESIDENT_COLS} FROM residents WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_resident_by_email error: {:?}", e);
            None
        })
    }

    /// create_resident
    ///
    /// Inserts a new resident account. The unique index on `email` turns a
    /// duplicate registration into `RepoError::Conflict`.
    async fn create_resident(
        &self,
        req: RegisterResidentRequest,
        password_hash: String,
    ) -> Result<Resident, RepoError> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Resident>(&format!(
            "INSERT INTO residents (id, name, email, password_hash, phone, unit_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {RESIDENT_COLS}"
        ))
        .bind(new_id)
        .bind(req.name)
        .bind(req.email)
        .bind(password_hash)
        .bind(req.phone)
        .bind(req.unit_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("create_resident", e))
    }

    /// get_resident_profile
    ///
    /// LEFT JOINs the unit so the profile can show the unit number even though
    /// `unit_id` is nullable.
    async fn get_resident_profile(&self, id: Uuid) -> Option<ResidentProfile> {
        sqlx::query_as::<_, ResidentProfile>(
            "SELECT r.id, r.name, r.email, r.phone, r.unit_id, u.number AS unit_number \
             FROM residents r \
             LEFT JOIN units u ON r.unit_id = u.id \
             WHERE r.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_resident_profile error: {:?}", e);
            None
        })
    }

    async fn list_residents(&self) -> Vec<Resident> {
        sqlx::query_as::<_, Resident>(&format!(
            "SELECT {RESIDENT_COLS} FROM residents ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_residents error: {:?}", e);
            vec![]
        })
    }

    async fn get_administrator(&self, id: Uuid) -> Option<Administrator> {
        sqlx::query_as::<_, Administrator>(
            "SELECT id, name, email, password_hash, created_at FROM administrators WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_administrator error: {:?}", e);
            None
        })
    }

    async fn get_administrator_by_email(&self, email: &str) -> Option<Administrator> {
        sqlx::query_as::<_, Administrator>(
            "SELECT id, name, email, password_hash, created_at FROM administrators WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_administrator_by_email error: {:?}", e);
            None
        })
    }

    // --- Units ---

    /// create_unit
    ///
    /// The unique index on `number` makes a duplicate unit label a Conflict.
    async fn create_unit(&self, req: CreateUnitRequest) -> Result<Unit, RepoError> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Unit>(
            "INSERT INTO units (id, number, block, floor) VALUES ($1, $2, $3, $4) \
             RETURNING id, number, block, floor, created_at",
        )
        .bind(new_id)
        .bind(req.number)
        .bind(req.block)
        .bind(req.floor)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("create_unit", e))
    }

    async fn list_units(&self) -> Vec<Unit> {
        sqlx::query_as::<_, Unit>(
            "SELECT id, number, block, floor, created_at FROM units ORDER BY number ASC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_units error: {:?}", e);
            vec![]
        })
    }

    /// update_unit
    ///
    /// Uses the PostgreSQL `COALESCE` function to handle `Option<T>` fields,
    /// only updating a column if the corresponding field in `req` is `Some`.
    /// Renaming onto a taken unit number hits the unique index and surfaces
    /// as `RepoError::Conflict`, same as the insert path.
    async fn update_unit(
        &self,
        id: Uuid,
        req: UpdateUnitRequest,
    ) -> Result<Option<Unit>, RepoError> {
        sqlx::query_as::<_, Unit>(
            "UPDATE units \
             SET number = COALESCE($2, number), \
                 block = COALESCE($3, block), \
                 floor = COALESCE($4, floor) \
             WHERE id = $1 \
             RETURNING id, number, block, floor, created_at",
        )
        .bind(id)
        .bind(req.number)
        .bind(req.block)
        .bind(req.floor)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("update_unit", e))
    }

    async fn delete_unit(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_unit error: {:?}", e);
                false
            }
        }
    }

    // --- Visitors ---

    /// create_visitor
    ///
    /// Inserts a visitor authorization. The unique index on `document` (CPF)
    /// turns a repeated authorization into `RepoError::Conflict`.
    async fn create_visitor(
        &self,
        req: CreateVisitorRequest,
        resident_id: Uuid,
    ) -> Result<Visitor, RepoError> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Visitor>(&format!(
            "INSERT INTO visitors (id, name, document, visit_date, has_vehicle, vehicle_plate, \
             vehicle_model, vehicle_color, observations, resident_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {VISITOR_COLS}"
        ))
        .bind(new_id)
        .bind(req.name)
        .bind(req.document)
        .bind(req.visit_date)
        .bind(req.has_vehicle)
        .bind(req.vehicle_plate)
        .bind(req.vehicle_model)
        .bind(req.vehicle_color)
        .bind(req.observations)
        .bind(resident_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("create_visitor", e))
    }

    async fn get_my_visitors(&self, resident_id: Uuid) -> Vec<Visitor> {
        sqlx::query_as::<_, Visitor>(&format!(
            "SELECT {VISITOR_COLS} FROM visitors WHERE resident_id = $1 ORDER BY visit_date DESC"
        ))
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_my_visitors error: {:?}", e);
            vec![]
        })
    }

    async fn list_visitors(&self) -> Vec<Visitor> {
        sqlx::query_as::<_, Visitor>(&format!(
            "SELECT {VISITOR_COLS} FROM visitors ORDER BY visit_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_visitors error: {:?}", e);
            vec![]
        })
    }

    // --- Incidents ---

    /// create_incident
    ///
    /// New incidents always start with status 'open' (database default).
    async fn create_incident(
        &self,
        req: CreateIncidentRequest,
        resident_id: Uuid,
    ) -> Result<Incident, RepoError> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Incident>(
            "INSERT INTO incidents (id, category, description, location, occurred_at, resident_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, category, description, location, occurred_at, status, resident_id, created_at",
        )
        .bind(new_id)
        .bind(req.category)
        .bind(req.description)
        .bind(req.location)
        .bind(req.occurred_at)
        .bind(resident_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("create_incident", e))
    }

    async fn get_my_incidents(&self, resident_id: Uuid) -> Vec<Incident> {
        sqlx::query_as::<_, Incident>(
            "SELECT id, category, description, location, occurred_at, status, resident_id, created_at \
             FROM incidents WHERE resident_id = $1 ORDER BY occurred_at DESC",
        )
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_my_incidents error: {:?}", e);
            vec![]
        })
    }

    async fn list_incidents(&self) -> Vec<Incident> {
        sqlx::query_as::<_, Incident>(
            "SELECT id, category, description, location, occurred_at, status, resident_id, created_at \
             FROM incidents ORDER BY status ASC, occurred_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_incidents error: {:?}", e);
            vec![]
        })
    }

    async fn set_incident_status(&self, id: Uuid, status: &str) -> Option<Incident> {
        sqlx::query_as::<_, Incident>(
            "UPDATE incidents SET status = $2 WHERE id = $1 \
             RETURNING id, category, description, location, occurred_at, status, resident_id, created_at",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_incident_status error: {:?}", e);
            None
        })
    }

    /// get_incident_summary
    ///
    /// Counts open incidents per category, busiest first. This backs the
    /// dashboard widget every authenticated user can see.
    async fn get_incident_summary(&self) -> Vec<IncidentSummary> {
        sqlx::query_as::<_, IncidentSummary>(
            "SELECT category, COUNT(*) AS count \
             FROM incidents \
             WHERE status = 'open' \
             GROUP BY category \
             ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_incident_summary error: {:?}", e);
            vec![]
        })
    }

    // --- Reservations ---

    /// create_reservation
    ///
    /// Inserts the pending reservation row. The composite unique index on
    /// `(space_name, reservation_date)` is the only cross-request ordering
    /// guard: the loser of a race gets `RepoError::Conflict`.
    async fn create_reservation(
        &self,
        req: CreateReservationRequest,
        resident_id: Uuid,
    ) -> Result<Reservation, RepoError> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Reservation>(&format!(
            "INSERT INTO reservations (id, space_name, reservation_date, resident_id) \
             VALUES ($1, $2, $3, $4) RETURNING {RESERVATION_COLS}"
        ))
        .bind(new_id)
        .bind(req.space_name)
        .bind(req.reservation_date)
        .bind(resident_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("create_reservation", e))
    }

    async fn attach_charge(&self, reservation_id: Uuid, charge_id: &str) -> bool {
        match sqlx::query("UPDATE reservations SET charge_id = $2 WHERE id = $1")
            .bind(reservation_id)
            .bind(charge_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("attach_charge error: {:?}", e);
                false
            }
        }
    }

    /// settle_reservation_by_charge
    ///
    /// The webhook correlates on `charge_id`, and only pending rows are
    /// eligible: a repeated callback for an already-settled charge matches
    /// nothing and resolves to None (the handler answers 404).
    async fn settle_reservation_by_charge(
        &self,
        charge_id: &str,
        status: &str,
    ) -> Option<Reservation> {
        sqlx::query_as::<_, Reservation>(&format!(
            "UPDATE reservations SET status = $2 \
             WHERE charge_id = $1 AND status = 'pending' RETURNING {RESERVATION_COLS}"
        ))
        .bind(charge_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("settle_reservation_by_charge error: {:?}", e);
            None
        })
    }

    async fn get_my_reservations(&self, resident_id: Uuid) -> Vec<Reservation> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLS} FROM reservations \
             WHERE resident_id = $1 ORDER BY reservation_date DESC"
        ))
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_my_reservations error: {:?}", e);
            vec![]
        })
    }

    async fn list_reservations(&self) -> Vec<Reservation> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLS} FROM reservations ORDER BY reservation_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_reservations error: {:?}", e);
            vec![]
        })
    }

    async fn set_reservation_status(&self, id: Uuid, status: &str) -> Option<Reservation> {
        sqlx::query_as::<_, Reservation>(&format!(
            "UPDATE reservations SET status = $2 WHERE id = $1 RETURNING {RESERVATION_COLS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_reservation_status error: {:?}", e);
            None
        })
    }

    // --- Packages ---

    /// register_package
    ///
    /// A bogus `resident_id`/`unit_id` hits the FK constraints and surfaces as
    /// `RepoError::InvalidReference` (400 at the handler).
    async fn register_package(&self, req: RegisterPackageRequest) -> Result<Package, RepoError> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Package>(&format!(
            "INSERT INTO packages (id, carrier, description, resident_id, unit_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PACKAGE_COLS}"
        ))
        .bind(new_id)
        .bind(req.carrier)
        .bind(req.description)
        .bind(req.resident_id)
        .bind(req.unit_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("register_package", e))
    }

    async fn get_package(&self, id: Uuid) -> Option<Package> {
        sqlx::query_as::<_, Package>(&format!(
            "SELECT {PACKAGE_COLS} FROM packages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_package error: {:?}", e);
            None
        })
    }

    async fn get_my_packages(&self, resident_id: Uuid) -> Vec<Package> {
        sqlx::query_as::<_, Package>(&format!(
            "SELECT {PACKAGE_COLS} FROM packages \
             WHERE resident_id = $1 ORDER BY status ASC, received_at DESC"
        ))
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_my_packages error: {:?}", e);
            vec![]
        })
    }

    /// mark_package_picked_up
    ///
    /// Guarded by `status = 'pending'` so a second pickup attempt matches
    /// nothing; the handler distinguishes "gone" from "already picked up".
    async fn mark_package_picked_up(&self, id: Uuid) -> Option<Package> {
        sqlx::query_as::<_, Package>(&format!(
            "UPDATE packages SET status = 'picked_up', picked_up_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING {PACKAGE_COLS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("mark_package_picked_up error: {:?}", e);
            None
        })
    }

    // --- Announcements ---

    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
        admin_id: Uuid,
    ) -> Result<Announcement, RepoError> {
        let new_id = Uuid::new_v4();
        let priority = req.priority.unwrap_or_else(|| "normal".to_string());
        sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements (id, title, body, priority, expires_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, title, body, priority, expires_at, created_by, created_at",
        )
        .bind(new_id)
        .bind(req.title)
        .bind(req.body)
        .bind(priority)
        .bind(req.expires_at)
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("create_announcement", e))
    }

    /// list_active_announcements
    ///
    /// Residents only see unexpired notices, urgent ones first.
    async fn list_active_announcements(&self) -> Vec<Announcement> {
        sqlx::query_as::<_, Announcement>(
            "SELECT id, title, body, priority, expires_at, created_by, created_at \
             FROM announcements \
             WHERE expires_at IS NULL OR expires_at > NOW() \
             ORDER BY CASE priority \
                 WHEN 'urgent' THEN 0 WHEN 'high' THEN 1 ELSE 2 END, \
                 created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_active_announcements error: {:?}", e);
            vec![]
        })
    }

    async fn delete_announcement(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_announcement error: {:?}", e);
                false
            }
        }
    }

    // --- Dashboard ---

    /// get_stats
    ///
    /// Compiles all counters for the administrative dashboard in a single call.
    async fn get_stats(&self) -> AdminDashboardStats {
        let total_residents = count(&self.pool, "SELECT COUNT(*) FROM residents").await;
        let total_units = count(&self.pool, "SELECT COUNT(*) FROM units").await;
        let open_incidents =
            count(&self.pool, "SELECT COUNT(*) FROM incidents WHERE status = 'open'").await;
        let pending_reservations = count(
            &self.pool,
            "SELECT COUNT(*) FROM reservations WHERE status = 'pending'",
        )
        .await;
        let pending_packages = count(
            &self.pool,
            "SELECT COUNT(*) FROM packages WHERE status = 'pending'",
        )
        .await;

        AdminDashboardStats {
            total_residents,
            total_units,
            open_incidents,
            pending_reservations,
            pending_packages,
        }
    }
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

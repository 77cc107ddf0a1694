// ABOUTME: The application state machine and assignment engine
// ABOUTME: Every mutation is one transaction over the affected application/truck/review rows

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::info;

use curbside_identity::{CallerIdentity, Capability, Role};
use curbside_storage::StorageError;
use curbside_trucks::{row_to_truck, ApplicationStatus, FoodTruck, FoodTruckCreateInput};

use crate::storage::{row_to_application, row_to_inspection, row_to_review};
use crate::types::{
    Application, Inspection, InspectionOutcome, InspectionResult, Review, ReviewDecision,
    ReviewStatus,
};

/// Workflow errors
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Transition attempted from wrong state")]
    InvalidState,
    #[error("Assignee does not hold the required role")]
    InvalidAssignment,
    #[error("Unit of work already has an active assignee")]
    AlreadyAssigned,
    #[error("Referenced record not found")]
    NotFound,
    #[error("Food truck is not approved")]
    NotApproved,
    #[error("Caller lacks the required capability")]
    Forbidden,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for WorkflowError {
    fn from(e: sqlx::Error) -> Self {
        WorkflowError::Storage(StorageError::Sqlx(e))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Drives applications from submission through review and inspection.
pub struct WorkflowEngine {
    pool: SqlitePool,
}

impl WorkflowEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a food truck together with its application, atomically.
    /// The application starts in SUBMITTED with no reviewer; vendor and
    /// region are denormalized here and never written again.
    pub async fn submit_food_truck(
        &self,
        caller: &CallerIdentity,
        brand_id: &str,
        input: FoodTruckCreateInput,
    ) -> WorkflowResult<(FoodTruck, Application)> {
        if !caller.can(Capability::ManageTrucks) {
            return Err(WorkflowError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let brand = sqlx::query("SELECT id, vendor_id FROM brands WHERE id = ?")
            .bind(brand_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WorkflowError::NotFound)?;
        let vendor_id: String = brand.try_get("vendor_id")?;

        // Vendors may only submit trucks for their own brands.
        if caller.role == Role::Vendor && caller.user_id != vendor_id {
            return Err(WorkflowError::Forbidden);
        }

        let truck_id = curbside_core::truck_id();
        let application_id = curbside_core::application_id();
        let now = Utc::now();
        let documents_json =
            serde_json::to_string(&input.documents).map_err(StorageError::Json)?;

        sqlx::query(
            r#"
            INSERT INTO food_trucks (
                id, brand_id, operating_region, location, phone_number,
                cuisine_specialties, menu_highlights, application_status,
                documents, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&truck_id)
        .bind(brand_id)
        .bind(&input.operating_region)
        .bind(&input.location)
        .bind(&input.phone_number)
        .bind(&input.cuisine_specialties)
        .bind(&input.menu_highlights)
        .bind(ApplicationStatus::Submitted)
        .bind(&documents_json)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO applications (
                id, food_truck_id, vendor_id, status, submission_date,
                reviewer_id, region, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, NULL, ?, ?, ?)
            "#,
        )
        .bind(&application_id)
        .bind(&truck_id)
        .bind(&vendor_id)
        .bind(ApplicationStatus::Submitted)
        .bind(now)
        .bind(&input.operating_region)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let truck_row = sqlx::query("SELECT * FROM food_trucks WHERE id = ?")
            .bind(&truck_id)
            .fetch_one(&mut *tx)
            .await?;
        let application_row = sqlx::query("SELECT * FROM applications WHERE id = ?")
            .bind(&application_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Submitted application {} for food truck {}",
            application_id, truck_id
        );
        Ok((row_to_truck(&truck_row)?, row_to_application(&application_row)?))
    }

    /// Bind a reviewer to an application. Valid from SUBMITTED or
    /// IN_REVIEW; re-assignment replaces the active assignee without
    /// resetting review history.
    pub async fn assign_reviewer(
        &self,
        caller: &CallerIdentity,
        application_id: &str,
        reviewer_id: &str,
    ) -> WorkflowResult<Application> {
        if !caller.can(Capability::AssignReviewer) {
            return Err(WorkflowError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let application_row = sqlx::query("SELECT * FROM applications WHERE id = ?")
            .bind(application_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WorkflowError::NotFound)?;
        let application = row_to_application(&application_row)?;

        if application.status.is_terminal() {
            return Err(WorkflowError::InvalidState);
        }

        let reviewer_role: Role = sqlx::query("SELECT role FROM users WHERE id = ?")
            .bind(reviewer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WorkflowError::NotFound)?
            .try_get("role")?;

        if reviewer_role != Role::Reviewer {
            return Err(WorkflowError::InvalidAssignment);
        }

        let now = Utc::now();

        sqlx::query(
            "UPDATE applications SET status = ?, reviewer_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(ApplicationStatus::InReview)
        .bind(reviewer_id)
        .bind(now)
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE food_trucks SET application_status = ?, updated_at = ? WHERE id = ?")
            .bind(ApplicationStatus::InReview)
            .bind(now)
            .bind(&application.food_truck_id)
            .execute(&mut *tx)
            .await?;

        // Reuse the active review cycle when one exists; otherwise open one.
        let active_review: Option<String> = sqlx::query_scalar(
            "SELECT id FROM reviews WHERE application_id = ? AND review_status = ?",
        )
        .bind(application_id)
        .bind(ReviewStatus::InProgress)
        .fetch_optional(&mut *tx)
        .await?;

        match active_review {
            Some(review_id) => {
                sqlx::query("UPDATE reviews SET reviewer_id = ?, updated_at = ? WHERE id = ?")
                    .bind(reviewer_id)
                    .bind(now)
                    .bind(&review_id)
                    .execute(&mut *tx)
                    .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO reviews (
                        id, application_id, reviewer_id, review_status,
                        review_date, created_at, updated_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(curbside_core::review_id())
                .bind(application_id)
                .bind(reviewer_id)
                .bind(ReviewStatus::InProgress)
                .bind(now)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        let updated_row = sqlx::query("SELECT * FROM applications WHERE id = ?")
            .bind(application_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Assigned reviewer {} to application {}",
            reviewer_id, application_id
        );
        Ok(row_to_application(&updated_row)?)
    }

    /// Record a terminal review decision and mirror it onto the parent
    /// application and its food truck, all in one transaction.
    pub async fn complete_review(
        &self,
        caller: &CallerIdentity,
        review_id: &str,
        decision: ReviewDecision,
    ) -> WorkflowResult<Review> {
        if !caller.can(Capability::CompleteReview) {
            return Err(WorkflowError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let review_row = sqlx::query("SELECT * FROM reviews WHERE id = ?")
            .bind(review_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WorkflowError::NotFound)?;
        let review = row_to_review(&review_row)?;

        // Reviewers may only complete their own assignments.
        if caller.role == Role::Reviewer && caller.user_id != review.reviewer_id {
            return Err(WorkflowError::Forbidden);
        }

        if review.review_status != ReviewStatus::InProgress {
            return Err(WorkflowError::InvalidState);
        }

        let application_row = sqlx::query("SELECT * FROM applications WHERE id = ?")
            .bind(&review.application_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WorkflowError::NotFound)?;
        let application = row_to_application(&application_row)?;

        let now = Utc::now();

        sqlx::query(
            "UPDATE reviews SET review_status = ?, review_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(decision.review_status())
        .bind(now)
        .bind(now)
        .bind(review_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ?")
            .bind(decision.application_status())
            .bind(now)
            .bind(&application.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE food_trucks SET application_status = ?, updated_at = ? WHERE id = ?")
            .bind(decision.application_status())
            .bind(now)
            .bind(&application.food_truck_id)
            .execute(&mut *tx)
            .await?;

        let updated_row = sqlx::query("SELECT * FROM reviews WHERE id = ?")
            .bind(review_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Completed review {} with {:?}", review_id, decision);
        Ok(row_to_review(&updated_row)?)
    }

    /// Bind an inspector to an approved food truck, opening an IN_PROGRESS
    /// inspection. At most one active inspection per truck; the uniqueness
    /// check re-runs inside the transaction so racing assigners lose
    /// cleanly with `AlreadyAssigned`.
    pub async fn assign_inspector(
        &self,
        caller: &CallerIdentity,
        food_truck_id: &str,
        inspector_id: &str,
    ) -> WorkflowResult<Inspection> {
        if !caller.can(Capability::AssignInspector) {
            return Err(WorkflowError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let truck_status: ApplicationStatus =
            sqlx::query("SELECT application_status FROM food_trucks WHERE id = ?")
                .bind(food_truck_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(WorkflowError::NotFound)?
                .try_get("application_status")?;

        if truck_status != ApplicationStatus::Approved {
            return Err(WorkflowError::NotApproved);
        }

        let inspector_role: Role = sqlx::query("SELECT role FROM users WHERE id = ?")
            .bind(inspector_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WorkflowError::NotFound)?
            .try_get("role")?;

        if inspector_role != Role::Inspector {
            return Err(WorkflowError::InvalidAssignment);
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inspections WHERE food_truck_id = ? AND result = ?",
        )
        .bind(food_truck_id)
        .bind(InspectionResult::InProgress)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(WorkflowError::AlreadyAssigned);
        }

        let inspection_id = curbside_core::inspection_id();
        Self::insert_open_inspection(&mut *tx, &inspection_id, food_truck_id, inspector_id).await?;

        let row = sqlx::query("SELECT * FROM inspections WHERE id = ?")
            .bind(&inspection_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Assigned inspector {} to food truck {}",
            inspector_id, food_truck_id
        );
        Ok(row_to_inspection(&row)?)
    }

    /// Insert an IN_PROGRESS inspection row. The partial unique index on
    /// active inspections backs up the caller's count check; a racer that
    /// slipped past it surfaces here as a constraint violation.
    async fn insert_open_inspection(
        executor: &mut sqlx::SqliteConnection,
        inspection_id: &str,
        food_truck_id: &str,
        inspector_id: &str,
    ) -> WorkflowResult<()> {
        let now = Utc::now();

        let insert = sqlx::query(
            r#"
            INSERT INTO inspections (
                id, food_truck_id, inspector_id, result,
                inspection_date, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(inspection_id)
        .bind(food_truck_id)
        .bind(inspector_id)
        .bind(InspectionResult::InProgress)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(executor)
        .await;

        if let Err(e) = insert {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                return Err(WorkflowError::AlreadyAssigned);
            }
            return Err(e.into());
        }

        Ok(())
    }

    /// Record a terminal inspection outcome. Purely observational: no
    /// cascade to the application or the food truck.
    pub async fn complete_inspection(
        &self,
        caller: &CallerIdentity,
        inspection_id: &str,
        outcome: InspectionOutcome,
        notes: Option<String>,
    ) -> WorkflowResult<Inspection> {
        if !caller.can(Capability::CompleteInspection) {
            return Err(WorkflowError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM inspections WHERE id = ?")
            .bind(inspection_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WorkflowError::NotFound)?;
        let inspection = row_to_inspection(&row)?;

        // Inspectors may only complete their own assignments.
        if caller.role == Role::Inspector && caller.user_id != inspection.inspector_id {
            return Err(WorkflowError::Forbidden);
        }

        if inspection.result != InspectionResult::InProgress {
            return Err(WorkflowError::InvalidState);
        }

        let now = Utc::now();

        sqlx::query(
            "UPDATE inspections SET result = ?, inspection_date = ?, notes = ?, updated_at = ? WHERE id = ?",
        )
        .bind(outcome.result())
        .bind(now)
        .bind(&notes)
        .bind(now)
        .bind(inspection_id)
        .execute(&mut *tx)
        .await?;

        let updated_row = sqlx::query("SELECT * FROM inspections WHERE id = ?")
            .bind(inspection_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Completed inspection {} with {:?}", inspection_id, outcome);
        Ok(row_to_inspection(&updated_row)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curbside_storage::connect_in_memory;

    async fn seed_approved_truck(conn: &mut sqlx::SqliteConnection) {
        let now = "2026-01-01T00:00:00Z";
        for sql in [
            format!(
                "INSERT INTO users (id, name, email, role, created_at, updated_at) \
                 VALUES ('user-iris', 'Iris Vega', 'iris@example.com', 'INSPECTOR', '{now}', '{now}')"
            ),
            format!(
                "INSERT INTO vendors (id, name, email, created_at, updated_at) \
                 VALUES ('vendor-1', 'Good Eats LLC', 'owner@example.com', '{now}', '{now}')"
            ),
            format!(
                "INSERT INTO brands (id, vendor_id, name, created_at, updated_at) \
                 VALUES ('brand-1', 'vendor-1', 'Taco Cart', '{now}', '{now}')"
            ),
            format!(
                "INSERT INTO food_trucks (id, brand_id, operating_region, application_status, created_at, updated_at) \
                 VALUES ('truck-1', 'brand-1', 'Downtown', 'APPROVED', '{now}', '{now}')"
            ),
        ] {
            sqlx::query(&sql).execute(&mut *conn).await.unwrap();
        }
    }

    // The losing side of a racing assignment: its count check saw no
    // active inspection, but another one landed before its insert.
    #[tokio::test]
    async fn test_conflicting_open_inspection_insert_reports_already_assigned() {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        seed_approved_truck(&mut conn).await;

        WorkflowEngine::insert_open_inspection(&mut conn, "insp-1", "truck-1", "user-iris")
            .await
            .unwrap();

        let err =
            WorkflowEngine::insert_open_inspection(&mut conn, "insp-2", "truck-1", "user-iris")
                .await
                .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyAssigned));

        // Only IN_PROGRESS rows occupy the index; a closed inspection
        // frees the truck for the next assignment.
        sqlx::query("UPDATE inspections SET result = 'FAIL' WHERE id = 'insp-1'")
            .execute(&mut *conn)
            .await
            .unwrap();

        WorkflowEngine::insert_open_inspection(&mut conn, "insp-3", "truck-1", "user-iris")
            .await
            .unwrap();
    }
}

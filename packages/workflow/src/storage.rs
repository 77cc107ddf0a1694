// ABOUTME: Read model for the licensing workflow
// ABOUTME: Paginated listings are live queries with whitelisted sort columns, stats are computed fresh

use sqlx::{Row, SqlitePool};
use tracing::debug;

use curbside_storage::{StorageError, StorageResult};
use curbside_trucks::ApplicationStatus;

use crate::types::{
    Application, ApplicationSortBy, ApplicationWithDetails, FoodTruckWithOwner, Inspection,
    InspectionResult, InspectorStats, PlatformStats, Review, ReviewStatus, ReviewerStats,
    SortDirection, terminal_ratio,
};

pub struct WorkflowStorage {
    pool: SqlitePool,
}

impl WorkflowStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== Applications ====================

    pub async fn get_application(&self, id: &str) -> StorageResult<Option<Application>> {
        let row = sqlx::query("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_application(&r)).transpose()
    }

    /// List applications, optionally filtered by status. Pagination is
    /// best-effort under concurrent inserts; no snapshot isolation.
    pub async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
        sort_by: ApplicationSortBy,
        direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> StorageResult<(Vec<Application>, i64)> {
        debug!(
            "Listing applications (status: {:?}, limit: {}, offset: {})",
            status, limit, offset
        );

        let (count, rows) = match status {
            Some(status) => {
                let count: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE status = ?")
                        .bind(status)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(StorageError::Sqlx)?;

                let query = format!(
                    "SELECT * FROM applications a WHERE a.status = ? ORDER BY {} {} LIMIT ? OFFSET ?",
                    sort_by.column(),
                    direction.keyword()
                );
                let rows = sqlx::query(&query)
                    .bind(status)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(StorageError::Sqlx)?;

                (count, rows)
            }
            None => {
                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(StorageError::Sqlx)?;

                let query = format!(
                    "SELECT * FROM applications a ORDER BY {} {} LIMIT ? OFFSET ?",
                    sort_by.column(),
                    direction.keyword()
                );
                let rows = sqlx::query(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(StorageError::Sqlx)?;

                (count, rows)
            }
        };

        let applications = rows
            .iter()
            .map(row_to_application)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((applications, count))
    }

    /// Unassigned work items: a live filter over reviewer_id, never a
    /// stored flag.
    pub async fn list_unassigned_applications(
        &self,
        sort_by: ApplicationSortBy,
        direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> StorageResult<(Vec<Application>, i64)> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE reviewer_id IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        let query = format!(
            "SELECT * FROM applications a WHERE a.reviewer_id IS NULL ORDER BY {} {} LIMIT ? OFFSET ?",
            sort_by.column(),
            direction.keyword()
        );
        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let applications = rows
            .iter()
            .map(row_to_application)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((applications, count))
    }

    /// Application listing joined with truck, brand, vendor, and reviewer
    /// details, computed at query time.
    pub async fn list_applications_with_details(
        &self,
        status: Option<ApplicationStatus>,
        sort_by: ApplicationSortBy,
        direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> StorageResult<(Vec<ApplicationWithDetails>, i64)> {
        let where_clause = if status.is_some() {
            "WHERE a.status = ?"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM applications a {}", where_clause);
        let mut count = sqlx::query_scalar(&count_query);
        if let Some(status) = status {
            count = count.bind(status);
        }
        let count: i64 = count
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let query = format!(
            r#"
            SELECT a.id, a.submission_date, a.status, a.food_truck_id,
                   t.location, t.operating_region, t.cuisine_specialties,
                   b.name AS brand_name, v.name AS vendor_name, v.email AS vendor_email,
                   r.id AS review_id, u.name AS reviewer_name
            FROM applications a
            JOIN food_trucks t ON t.id = a.food_truck_id
            LEFT JOIN brands b ON b.id = t.brand_id
            LEFT JOIN vendors v ON v.id = b.vendor_id
            LEFT JOIN reviews r ON r.id = (
                SELECT id FROM reviews
                WHERE application_id = a.id
                ORDER BY created_at DESC
                LIMIT 1
            )
            LEFT JOIN users u ON u.id = a.reviewer_id
            {}
            ORDER BY {} {}
            LIMIT ? OFFSET ?
            "#,
            where_clause,
            sort_by.column(),
            direction.keyword()
        );

        let mut query = sqlx::query(&query);
        if let Some(status) = status {
            query = query.bind(status);
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let details = rows
            .iter()
            .map(|row| {
                Ok(ApplicationWithDetails {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    submission_date: row
                        .try_get("submission_date")
                        .map_err(StorageError::Sqlx)?,
                    status: row.try_get("status").map_err(StorageError::Sqlx)?,
                    food_truck_id: row
                        .try_get("food_truck_id")
                        .map_err(StorageError::Sqlx)?,
                    location: row.try_get("location").map_err(StorageError::Sqlx)?,
                    operating_region: row
                        .try_get("operating_region")
                        .map_err(StorageError::Sqlx)?,
                    cuisine_specialties: row
                        .try_get("cuisine_specialties")
                        .map_err(StorageError::Sqlx)?,
                    brand_name: row.try_get("brand_name").map_err(StorageError::Sqlx)?,
                    vendor_name: row.try_get("vendor_name").map_err(StorageError::Sqlx)?,
                    vendor_email: row.try_get("vendor_email").map_err(StorageError::Sqlx)?,
                    review_id: row.try_get("review_id").map_err(StorageError::Sqlx)?,
                    reviewer_name: row.try_get("reviewer_name").map_err(StorageError::Sqlx)?,
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((details, count))
    }

    /// Food trucks whose application holds the given status, joined with
    /// owner details. APPROVED feeds the inspector-assignment screen.
    pub async fn list_trucks_by_application_status(
        &self,
        status: ApplicationStatus,
    ) -> StorageResult<Vec<FoodTruckWithOwner>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.operating_region, t.location, t.cuisine_specialties,
                   t.menu_highlights, b.name AS brand_name,
                   v.name AS vendor_name, v.email AS vendor_email
            FROM food_trucks t
            JOIN applications a ON a.food_truck_id = t.id
            LEFT JOIN brands b ON b.id = t.brand_id
            LEFT JOIN vendors v ON v.id = b.vendor_id
            WHERE a.status = ?
            ORDER BY t.created_at
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(FoodTruckWithOwner {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    brand_name: row.try_get("brand_name").map_err(StorageError::Sqlx)?,
                    vendor_name: row.try_get("vendor_name").map_err(StorageError::Sqlx)?,
                    vendor_email: row.try_get("vendor_email").map_err(StorageError::Sqlx)?,
                    operating_region: row
                        .try_get("operating_region")
                        .map_err(StorageError::Sqlx)?,
                    location: row.try_get("location").map_err(StorageError::Sqlx)?,
                    cuisine_specialties: row
                        .try_get("cuisine_specialties")
                        .map_err(StorageError::Sqlx)?,
                    menu_highlights: row
                        .try_get("menu_highlights")
                        .map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }

    // ==================== Reviews ====================

    pub async fn get_review(&self, id: &str) -> StorageResult<Option<Review>> {
        let row = sqlx::query("SELECT * FROM reviews WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_review(&r)).transpose()
    }

    pub async fn list_reviews_by_reviewer(
        &self,
        reviewer_id: &str,
        status: Option<ReviewStatus>,
        limit: i64,
        offset: i64,
    ) -> StorageResult<(Vec<Review>, i64)> {
        debug!(
            "Listing reviews for reviewer: {} (status: {:?})",
            reviewer_id, status
        );

        let (count, rows) = match status {
            Some(status) => {
                let count: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM reviews WHERE reviewer_id = ? AND review_status = ?",
                )
                .bind(reviewer_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

                let rows = sqlx::query(
                    "SELECT * FROM reviews WHERE reviewer_id = ? AND review_status = ? \
                     ORDER BY review_date DESC LIMIT ? OFFSET ?",
                )
                .bind(reviewer_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

                (count, rows)
            }
            None => {
                let count: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE reviewer_id = ?")
                        .bind(reviewer_id)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(StorageError::Sqlx)?;

                let rows = sqlx::query(
                    "SELECT * FROM reviews WHERE reviewer_id = ? \
                     ORDER BY review_date DESC LIMIT ? OFFSET ?",
                )
                .bind(reviewer_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

                (count, rows)
            }
        };

        let reviews = rows
            .iter()
            .map(row_to_review)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((reviews, count))
    }

    pub async fn reviewer_stats(&self, reviewer_id: &str) -> StorageResult<ReviewerStats> {
        let count_by = |status: ReviewStatus| {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM reviews WHERE reviewer_id = ? AND review_status = ?",
            )
            .bind(reviewer_id.to_string())
            .bind(status)
            .fetch_one(&self.pool)
        };

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE reviewer_id = ?")
            .bind(reviewer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        let pending = count_by(ReviewStatus::InProgress)
            .await
            .map_err(StorageError::Sqlx)?;
        let approved = count_by(ReviewStatus::Approved)
            .await
            .map_err(StorageError::Sqlx)?;
        let rejected = count_by(ReviewStatus::Rejected)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(ReviewerStats {
            total_reviews: total,
            pending_reviews: pending,
            approved_reviews: approved,
            rejected_reviews: rejected,
            approval_rate: terminal_ratio(approved, rejected),
        })
    }

    // ==================== Inspections ====================

    pub async fn get_inspection(&self, id: &str) -> StorageResult<Option<Inspection>> {
        let row = sqlx::query("SELECT * FROM inspections WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_inspection(&r)).transpose()
    }

    pub async fn list_inspections_by_inspector(
        &self,
        inspector_id: &str,
        result: Option<InspectionResult>,
    ) -> StorageResult<Vec<Inspection>> {
        let rows = match result {
            Some(result) => {
                sqlx::query(
                    "SELECT * FROM inspections WHERE inspector_id = ? AND result = ? \
                     ORDER BY inspection_date DESC",
                )
                .bind(inspector_id)
                .bind(result)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT * FROM inspections WHERE inspector_id = ? \
                     ORDER BY inspection_date DESC",
                )
                .bind(inspector_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_inspection).collect()
    }

    pub async fn inspector_stats(&self, inspector_id: &str) -> StorageResult<InspectorStats> {
        let count_by = |result: InspectionResult| {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM inspections WHERE inspector_id = ? AND result = ?",
            )
            .bind(inspector_id.to_string())
            .bind(result)
            .fetch_one(&self.pool)
        };

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inspections WHERE inspector_id = ?")
                .bind(inspector_id)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;
        let pending = count_by(InspectionResult::InProgress)
            .await
            .map_err(StorageError::Sqlx)?;
        let passed = count_by(InspectionResult::Pass)
            .await
            .map_err(StorageError::Sqlx)?;
        let failed = count_by(InspectionResult::Fail)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(InspectorStats {
            total_inspections: total,
            pending_inspections: pending,
            passed_inspections: passed,
            failed_inspections: failed,
            pass_rate: terminal_ratio(passed, failed),
        })
    }

    // ==================== Platform stats ====================

    pub async fn platform_stats(&self) -> StorageResult<PlatformStats> {
        let count_by = |status: ApplicationStatus| {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications WHERE status = ?")
                .bind(status)
                .fetch_one(&self.pool)
        };

        let submitted = count_by(ApplicationStatus::Submitted)
            .await
            .map_err(StorageError::Sqlx)?;
        let in_review = count_by(ApplicationStatus::InReview)
            .await
            .map_err(StorageError::Sqlx)?;
        let approved = count_by(ApplicationStatus::Approved)
            .await
            .map_err(StorageError::Sqlx)?;
        let rejected = count_by(ApplicationStatus::Rejected)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(PlatformStats {
            submitted,
            in_review,
            approved,
            rejected,
            approval_rate: terminal_ratio(approved, rejected),
        })
    }
}

// ==================== Row converters ====================

pub(crate) fn row_to_application(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Application> {
    Ok(Application {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        food_truck_id: row.try_get("food_truck_id").map_err(StorageError::Sqlx)?,
        vendor_id: row.try_get("vendor_id").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        submission_date: row
            .try_get("submission_date")
            .map_err(StorageError::Sqlx)?,
        reviewer_id: row.try_get("reviewer_id").map_err(StorageError::Sqlx)?,
        region: row.try_get("region").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

pub(crate) fn row_to_review(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Review> {
    Ok(Review {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        application_id: row.try_get("application_id").map_err(StorageError::Sqlx)?,
        reviewer_id: row.try_get("reviewer_id").map_err(StorageError::Sqlx)?,
        review_status: row.try_get("review_status").map_err(StorageError::Sqlx)?,
        review_date: row.try_get("review_date").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

pub(crate) fn row_to_inspection(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Inspection> {
    Ok(Inspection {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        food_truck_id: row.try_get("food_truck_id").map_err(StorageError::Sqlx)?,
        inspector_id: row.try_get("inspector_id").map_err(StorageError::Sqlx)?,
        result: row.try_get("result").map_err(StorageError::Sqlx)?,
        inspection_date: row
            .try_get("inspection_date")
            .map_err(StorageError::Sqlx)?,
        notes: row.try_get("notes").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

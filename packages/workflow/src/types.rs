// ABOUTME: Application, review, and inspection type definitions
// ABOUTME: Statuses are closed enums; terminal decisions are separate two-variant enums

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use curbside_trucks::ApplicationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    InProgress,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewStatus::InProgress)
    }
}

/// A reviewer's terminal judgment. IN_PROGRESS is unrepresentable here, so
/// `complete_review` cannot be asked to move a review backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn review_status(&self) -> ReviewStatus {
        match self {
            ReviewDecision::Approved => ReviewStatus::Approved,
            ReviewDecision::Rejected => ReviewStatus::Rejected,
        }
    }

    pub fn application_status(&self) -> ApplicationStatus {
        match self {
            ReviewDecision::Approved => ApplicationStatus::Approved,
            ReviewDecision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(ReviewDecision::Approved),
            "REJECTED" => Ok(ReviewDecision::Rejected),
            other => Err(format!("unknown review decision: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionResult {
    InProgress,
    Pass,
    Fail,
}

/// Terminal outcome of a physical inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionOutcome {
    Pass,
    Fail,
}

impl InspectionOutcome {
    pub fn result(&self) -> InspectionResult {
        match self {
            InspectionOutcome::Pass => InspectionResult::Pass,
            InspectionOutcome::Fail => InspectionResult::Fail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(rename = "foodTruckId")]
    pub food_truck_id: String,
    #[serde(rename = "vendorId")]
    pub vendor_id: String,
    pub status: ApplicationStatus,
    #[serde(rename = "submissionDate")]
    pub submission_date: DateTime<Utc>,
    #[serde(rename = "reviewerId")]
    pub reviewer_id: Option<String>,
    pub region: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(rename = "applicationId")]
    pub application_id: String,
    #[serde(rename = "reviewerId")]
    pub reviewer_id: String,
    #[serde(rename = "reviewStatus")]
    pub review_status: ReviewStatus,
    #[serde(rename = "reviewDate")]
    pub review_date: DateTime<Utc>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub id: String,
    #[serde(rename = "foodTruckId")]
    pub food_truck_id: String,
    #[serde(rename = "inspectorId")]
    pub inspector_id: String,
    pub result: InspectionResult,
    #[serde(rename = "inspectionDate")]
    pub inspection_date: DateTime<Utc>,
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Application list row joined with truck, brand, vendor, and reviewer
/// details. Computed at query time; nothing here is stored twice.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithDetails {
    pub id: String,
    #[serde(rename = "submissionDate")]
    pub submission_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    #[serde(rename = "foodTruckId")]
    pub food_truck_id: String,
    pub location: Option<String>,
    #[serde(rename = "operatingRegion")]
    pub operating_region: String,
    #[serde(rename = "cuisineSpecialties")]
    pub cuisine_specialties: Option<String>,
    #[serde(rename = "brandName")]
    pub brand_name: Option<String>,
    #[serde(rename = "vendorName")]
    pub vendor_name: Option<String>,
    #[serde(rename = "vendorEmail")]
    pub vendor_email: Option<String>,
    #[serde(rename = "reviewId")]
    pub review_id: Option<String>,
    #[serde(rename = "reviewerName")]
    pub reviewer_name: Option<String>,
}

/// A food truck joined with its owning brand and vendor, for the
/// inspector-assignment listing.
#[derive(Debug, Clone, Serialize)]
pub struct FoodTruckWithOwner {
    pub id: String,
    #[serde(rename = "brandName")]
    pub brand_name: Option<String>,
    #[serde(rename = "vendorName")]
    pub vendor_name: Option<String>,
    #[serde(rename = "vendorEmail")]
    pub vendor_email: Option<String>,
    #[serde(rename = "operatingRegion")]
    pub operating_region: String,
    pub location: Option<String>,
    #[serde(rename = "cuisineSpecialties")]
    pub cuisine_specialties: Option<String>,
    #[serde(rename = "menuHighlights")]
    pub menu_highlights: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewerStats {
    #[serde(rename = "totalReviews")]
    pub total_reviews: i64,
    #[serde(rename = "pendingReviews")]
    pub pending_reviews: i64,
    #[serde(rename = "approvedReviews")]
    pub approved_reviews: i64,
    #[serde(rename = "rejectedReviews")]
    pub rejected_reviews: i64,
    #[serde(rename = "approvalRate")]
    pub approval_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectorStats {
    #[serde(rename = "totalInspections")]
    pub total_inspections: i64,
    #[serde(rename = "pendingInspections")]
    pub pending_inspections: i64,
    #[serde(rename = "passedInspections")]
    pub passed_inspections: i64,
    #[serde(rename = "failedInspections")]
    pub failed_inspections: i64,
    #[serde(rename = "passRate")]
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub submitted: i64,
    #[serde(rename = "inReview")]
    pub in_review: i64,
    pub approved: i64,
    pub rejected: i64,
    #[serde(rename = "approvalRate")]
    pub approval_rate: f64,
}

/// Ratio of approvals among terminal outcomes; 0 when nothing is terminal
/// yet, so dashboards never divide by zero.
pub fn terminal_ratio(approved: i64, rejected: i64) -> f64 {
    let denominator = approved + rejected;
    if denominator == 0 {
        0.0
    } else {
        approved as f64 / denominator as f64
    }
}

/// Whitelisted sort columns for application listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationSortBy {
    #[default]
    SubmissionDate,
    Status,
    Id,
}

impl ApplicationSortBy {
    pub fn column(&self) -> &'static str {
        match self {
            ApplicationSortBy::SubmissionDate => "a.submission_date",
            ApplicationSortBy::Status => "a.status",
            ApplicationSortBy::Id => "a.id",
        }
    }
}

impl FromStr for ApplicationSortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submissionDate" | "submission_date" => Ok(ApplicationSortBy::SubmissionDate),
            "status" => Ok(ApplicationSortBy::Status),
            "id" => Ok(ApplicationSortBy::Id),
            other => Err(format!("unsortable column: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_maps_to_both_statuses() {
        assert_eq!(
            ReviewDecision::Approved.review_status(),
            ReviewStatus::Approved
        );
        assert_eq!(
            ReviewDecision::Rejected.application_status(),
            ApplicationStatus::Rejected
        );
    }

    #[test]
    fn test_terminal_ratio_zero_denominator() {
        assert_eq!(terminal_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_terminal_ratio() {
        assert_eq!(terminal_ratio(3, 1), 0.75);
        assert_eq!(terminal_ratio(0, 2), 0.0);
        assert_eq!(terminal_ratio(2, 0), 1.0);
    }

    #[test]
    fn test_sort_by_whitelist() {
        assert_eq!(
            "submissionDate".parse::<ApplicationSortBy>().unwrap(),
            ApplicationSortBy::SubmissionDate
        );
        assert!("reviewer_id; DROP TABLE applications"
            .parse::<ApplicationSortBy>()
            .is_err());
    }
}

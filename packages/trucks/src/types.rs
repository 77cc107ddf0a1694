// ABOUTME: Food truck and menu item type definitions
// ABOUTME: A truck's application_status mirrors its licensing application and gates mutation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Licensing state of a food truck's application. Synchronized onto the
/// truck record by the workflow engine; never written anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    InReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::InReview => "IN_REVIEW",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMITTED" => Ok(ApplicationStatus::Submitted),
            "IN_REVIEW" => Ok(ApplicationStatus::InReview),
            "APPROVED" => Ok(ApplicationStatus::Approved),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

/// Reference to an uploaded document. The blob itself lives in an external
/// store; only the path is tracked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodTruck {
    pub id: String,
    #[serde(rename = "brandId")]
    pub brand_id: String,
    #[serde(rename = "operatingRegion")]
    pub operating_region: String,
    pub location: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "cuisineSpecialties")]
    pub cuisine_specialties: Option<String>,
    #[serde(rename = "menuHighlights")]
    pub menu_highlights: Option<String>,
    #[serde(rename = "applicationStatus")]
    pub application_status: ApplicationStatus,
    pub documents: Vec<DocumentRef>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodTruckCreateInput {
    #[serde(rename = "operatingRegion")]
    pub operating_region: String,
    pub location: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "cuisineSpecialties")]
    pub cuisine_specialties: Option<String>,
    #[serde(rename = "menuHighlights")]
    pub menu_highlights: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodTruckUpdateInput {
    #[serde(rename = "operatingRegion")]
    pub operating_region: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "cuisineSpecialties")]
    pub cuisine_specialties: Option<String>,
    #[serde(rename = "menuHighlights")]
    pub menu_highlights: Option<String>,
    pub documents: Option<Vec<DocumentRef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    #[serde(rename = "foodTruckId")]
    pub food_truck_id: String,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreateInput {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdateInput {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

// ABOUTME: Router-level tests for the licensing API
// ABOUTME: Drives the full axum router over an in-memory SQLite database

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use curbside_api::{create_api_router, DbState};
use curbside_identity::{Role, UserCreateInput, UserStorage};
use curbside_storage::connect_in_memory;

struct TestApp {
    router: Router,
    admin_id: String,
    reviewer_id: String,
    inspector_id: String,
}

async fn setup() -> TestApp {
    let pool = connect_in_memory().await.unwrap();
    let users = UserStorage::new(pool.clone());

    let admin = users
        .create_user(UserCreateInput {
            name: "Ada Admin".to_string(),
            email: "ada@curbside.test".to_string(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    let reviewer = users
        .create_user(UserCreateInput {
            name: "Rae Reviewer".to_string(),
            email: "rae@curbside.test".to_string(),
            role: Role::Reviewer,
        })
        .await
        .unwrap();
    let inspector = users
        .create_user(UserCreateInput {
            name: "Ira Inspector".to_string(),
            email: "ira@curbside.test".to_string(),
            role: Role::Inspector,
        })
        .await
        .unwrap();

    TestApp {
        router: create_api_router(DbState::new(pool)),
        admin_id: admin.id,
        reviewer_id: reviewer.id,
        inspector_id: inspector.id,
    }
}

impl TestApp {
    async fn request(
        &self,
        method: &str,
        uri: &str,
        caller: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, role)) = caller {
            builder = builder.header("X-Caller-Id", id).header("X-Caller-Role", role);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn as_admin(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let admin_id = self.admin_id.clone();
        self.request(method, uri, Some((&admin_id, "ADMIN")), body)
            .await
    }

    /// Seed a vendor + brand and return the brand id.
    async fn seed_brand(&self) -> String {
        let (status, body) = self
            .as_admin(
                "POST",
                "/api/vendors",
                Some(json!({ "name": "Good Eats LLC", "email": "owner@goodeats.test" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let vendor_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = self
            .as_admin(
                "POST",
                "/api/brands",
                Some(json!({ "vendorId": vendor_id, "name": "Taco Cart" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Submit a truck and return (truck_id, application_id).
    async fn submit_truck(&self, brand_id: &str) -> (String, String) {
        let (status, body) = self
            .as_admin(
                "POST",
                &format!("/api/foodtrucks/{}", brand_id),
                Some(json!({ "operatingRegion": "North", "location": "5th and Main" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        (
            body["data"]["foodTruck"]["id"].as_str().unwrap().to_string(),
            body["data"]["application"]["id"].as_str().unwrap().to_string(),
        )
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_submit_truck_creates_application() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;

    let (_, application_id) = app.submit_truck(&brand_id).await;

    let (status, body) = app
        .request("GET", &format!("/api/applications/{}", application_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("SUBMITTED"));
    assert_eq!(body["data"]["reviewerId"], Value::Null);
}

#[tokio::test]
async fn test_mutations_require_caller_headers() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/foodtrucks/{}", brand_id),
            None,
            Some(json!({ "operatingRegion": "North" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/foodtrucks/{}", brand_id),
            Some(("user-x", "MAYOR")),
            Some(json!({ "operatingRegion": "North" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_assign_reviewer_roundtrip() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;
    let (_, application_id) = app.submit_truck(&brand_id).await;

    let (status, body) = app
        .as_admin(
            "POST",
            &format!(
                "/api/applications/{}/assign-reviewer/{}",
                application_id, app.reviewer_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("IN_REVIEW"));

    // Assigning a non-reviewer is rejected as unprocessable.
    let (other_truck, other_app) = {
        let brand = app.seed_brand_named("Second Cart").await;
        app.submit_truck(&brand).await
    };
    let _ = other_truck;
    let (status, _) = app
        .as_admin(
            "POST",
            &format!(
                "/api/applications/{}/assign-reviewer/{}",
                other_app, app.inspector_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // A reviewer-role caller may not assign.
    let reviewer_id = app.reviewer_id.clone();
    let (status, _) = app
        .request(
            "POST",
            &format!(
                "/api/applications/{}/assign-reviewer/{}",
                application_id, reviewer_id
            ),
            Some((&reviewer_id, "REVIEWER")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

impl TestApp {
    async fn seed_brand_named(&self, name: &str) -> String {
        let (_, body) = self
            .as_admin(
                "POST",
                "/api/vendors",
                Some(json!({
                    "name": format!("{} LLC", name),
                    "email": format!("{}@goodeats.test", name.replace(' ', "-").to_lowercase()),
                })),
            )
            .await;
        let vendor_id = body["data"]["id"].as_str().unwrap().to_string();
        let (_, body) = self
            .as_admin(
                "POST",
                "/api/brands",
                Some(json!({ "vendorId": vendor_id, "name": name })),
            )
            .await;
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Drive an application through approval; returns the truck id.
    async fn approve(&self, truck_id: &str, application_id: &str) -> String {
        let (status, _) = self
            .as_admin(
                "POST",
                &format!(
                    "/api/applications/{}/assign-reviewer/{}",
                    application_id, self.reviewer_id
                ),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = self
            .request(
                "GET",
                &format!("/api/reviews/reviewer/{}/pending", self.reviewer_id),
                None,
                None,
            )
            .await;
        let review_id = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["applicationId"] == json!(application_id))
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let (status, _) = self
            .as_admin(
                "PUT",
                &format!("/api/reviews/{}/status/APPROVED", review_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        truck_id.to_string()
    }
}

#[tokio::test]
async fn test_full_licensing_scenario() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;
    let (truck_id, application_id) = app.submit_truck(&brand_id).await;

    app.approve(&truck_id, &application_id).await;

    // The truck now shows as approved with owner details.
    let (status, body) = app
        .request("GET", "/api/applications/foodtrucks/status/APPROVED", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], json!(truck_id));
    assert_eq!(body["data"][0]["vendorName"], json!("Good Eats LLC"));

    // Inspector assignment now succeeds; a second attempt conflicts.
    let (status, body) = app
        .as_admin(
            "POST",
            &format!(
                "/api/inspections/assign/{}/inspector/{}",
                truck_id, app.inspector_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let inspection_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .as_admin(
            "POST",
            &format!(
                "/api/inspections/assign/{}/inspector/{}",
                truck_id, app.inspector_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The assigned inspector completes with notes.
    let inspector_id = app.inspector_id.clone();
    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/inspections/{}/complete", inspection_id),
            Some((&inspector_id, "INSPECTOR")),
            Some(json!({ "result": "PASS", "notes": "clean install" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], json!("PASS"));
    assert_eq!(body["data"]["notes"], json!("clean install"));

    // Approved trucks accept menu items.
    let (status, _) = app
        .as_admin(
            "POST",
            &format!("/api/foodtrucks/{}/menu-items", truck_id),
            Some(json!({ "name": "Al Pastor", "price": 4.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.request("GET", "/api/stats/platform", None, None).await;
    assert_eq!(body["data"]["approved"], json!(1));
    assert_eq!(body["data"]["approvalRate"], json!(1.0));
}

#[tokio::test]
async fn test_inspector_assignment_blocked_before_approval() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;
    let (truck_id, _) = app.submit_truck(&brand_id).await;

    let (status, _) = app
        .as_admin(
            "POST",
            &format!(
                "/api/inspections/assign/{}/inspector/{}",
                truck_id, app.inspector_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Menu items are equally gated pre-approval.
    let (status, _) = app
        .as_admin(
            "POST",
            &format!("/api/foodtrucks/{}/menu-items", truck_id),
            Some(json!({ "name": "Al Pastor", "price": 4.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_terminal_review_conflicts() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;
    let (truck_id, application_id) = app.submit_truck(&brand_id).await;
    app.approve(&truck_id, &application_id).await;

    // The review is terminal; deciding again conflicts.
    let (_, body) = app
        .request(
            "GET",
            &format!("/api/reviews/reviewer/{}", app.reviewer_id),
            None,
            None,
        )
        .await;
    let review_id = body["data"]["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .as_admin(
            "PUT",
            &format!("/api/reviews/{}/status/REJECTED", review_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unknown decisions never reach the engine.
    let (status, _) = app
        .as_admin(
            "PUT",
            &format!("/api/reviews/{}/status/MAYBE", review_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Re-assignment after the terminal decision conflicts too.
    let (status, _) = app
        .as_admin(
            "POST",
            &format!(
                "/api/applications/{}/assign-reviewer/{}",
                application_id, app.reviewer_id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_listing_endpoints() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;
    let (_, first) = app.submit_truck(&brand_id).await;
    app.submit_truck(&brand_id).await;

    let (status, body) = app
        .request("GET", "/api/applications?page=1&size=1", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalItems"], json!(2));
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .request("GET", "/api/applications/unassigned", None, None)
        .await;
    assert_eq!(body["data"]["pagination"]["totalItems"], json!(2));

    app.as_admin(
        "POST",
        &format!(
            "/api/applications/{}/assign-reviewer/{}",
            first, app.reviewer_id
        ),
        None,
    )
    .await;

    let (_, body) = app
        .request("GET", "/api/applications/unassigned", None, None)
        .await;
    assert_eq!(body["data"]["pagination"]["totalItems"], json!(1));

    let (_, body) = app
        .request("GET", "/api/applications/with-details", None, None)
        .await;
    assert_eq!(body["data"]["data"][0]["brandName"], json!("Taco Cart"));

    let (_, body) = app
        .request("GET", "/api/applications/reviewers", None, None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Unknown sort columns are rejected before touching SQL.
    let (status, _) = app
        .request("GET", "/api/applications?sortBy=;DROP%20TABLE", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_management_requires_super_admin() {
    let app = setup().await;

    let (status, _) = app
        .as_admin(
            "POST",
            "/api/users",
            Some(json!({ "name": "New Reviewer", "email": "new@curbside.test", "role": "REVIEWER" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            "POST",
            "/api/users",
            Some(("user-root", "SUPER_ADMIN")),
            Some(json!({ "name": "New Reviewer", "email": "new@curbside.test", "role": "REVIEWER" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], json!("REVIEWER"));
}

#[tokio::test]
async fn test_vendor_restrict_delete() {
    let app = setup().await;
    let brand_id = app.seed_brand().await;

    let (_, body) = app.request("GET", "/api/vendors", None, None).await;
    let vendor_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .as_admin("DELETE", &format!("/api/vendors/{}", vendor_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .as_admin("DELETE", &format!("/api/brands/{}", brand_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .as_admin("DELETE", &format!("/api/vendors/{}", vendor_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

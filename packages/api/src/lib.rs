// ABOUTME: HTTP API for the Curbside licensing platform
// ABOUTME: Routers per domain, all mounted under /api by the server binary

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod application_handlers;
pub mod caller;
pub mod db;
pub mod inspection_handlers;
pub mod pagination;
pub mod response;
pub mod review_handlers;
pub mod truck_handlers;
pub mod user_handlers;
pub mod vendor_handlers;

pub use caller::Caller;
pub use db::DbState;
pub use pagination::{Page, PaginatedResponse, PaginationMeta};
pub use response::{ApiError, ApiResponse};

/// Creates the applications API router
pub fn create_applications_router() -> Router<DbState> {
    Router::new()
        .route("/", get(application_handlers::list_applications))
        .route(
            "/with-details",
            get(application_handlers::list_applications_with_details),
        )
        .route(
            "/unassigned",
            get(application_handlers::list_unassigned_applications),
        )
        .route("/reviewers", get(application_handlers::list_reviewers))
        .route(
            "/foodtrucks/status/{status}",
            get(application_handlers::list_trucks_by_status),
        )
        .route("/{id}", get(application_handlers::get_application))
        .route(
            "/{id}/assign-reviewer/{reviewer_id}",
            post(application_handlers::assign_reviewer),
        )
}

/// Creates the reviews API router
pub fn create_reviews_router() -> Router<DbState> {
    Router::new()
        .route("/{id}", get(review_handlers::get_review))
        .route(
            "/{id}/status/{decision}",
            put(review_handlers::complete_review),
        )
        .route(
            "/reviewer/{reviewer_id}",
            get(review_handlers::list_reviews_by_reviewer),
        )
        .route(
            "/reviewer/{reviewer_id}/pending",
            get(review_handlers::list_pending_reviews),
        )
        .route(
            "/reviewer/{reviewer_id}/stats",
            get(review_handlers::reviewer_stats),
        )
}

/// Creates the inspections API router
pub fn create_inspections_router() -> Router<DbState> {
    Router::new()
        .route(
            "/assign/{food_truck_id}/inspector/{inspector_id}",
            post(inspection_handlers::assign_inspector),
        )
        .route(
            "/{id}/complete",
            put(inspection_handlers::complete_inspection),
        )
        .route("/{id}", get(inspection_handlers::get_inspection))
        .route(
            "/inspector/{inspector_id}",
            get(inspection_handlers::list_inspections_by_inspector),
        )
        .route(
            "/inspector/{inspector_id}/pending",
            get(inspection_handlers::list_pending_inspections),
        )
        .route(
            "/inspector/{inspector_id}/stats",
            get(inspection_handlers::inspector_stats),
        )
}

/// Creates the food trucks API router
pub fn create_trucks_router() -> Router<DbState> {
    Router::new()
        .route("/brand/{brand_id}", get(truck_handlers::list_trucks_by_brand))
        // POST /{id} takes the brand id; the truck id is generated server-side.
        .route("/{id}", post(truck_handlers::create_truck))
        .route("/{id}", get(truck_handlers::get_truck))
        .route("/{id}", put(truck_handlers::update_truck))
        .route("/{id}", delete(truck_handlers::delete_truck))
        .route("/{id}/menu-items", get(truck_handlers::list_menu_items))
        .route("/{id}/menu-items", post(truck_handlers::create_menu_item))
}

/// Creates the menu items API router
pub fn create_menu_items_router() -> Router<DbState> {
    Router::new()
        .route("/{id}", get(truck_handlers::get_menu_item))
        .route("/{id}", put(truck_handlers::update_menu_item))
        .route("/{id}", delete(truck_handlers::delete_menu_item))
}

/// Creates the vendors API router
pub fn create_vendors_router() -> Router<DbState> {
    Router::new()
        .route("/", get(vendor_handlers::list_vendors))
        .route("/", post(vendor_handlers::create_vendor))
        .route("/{id}", get(vendor_handlers::get_vendor))
        .route("/{id}", put(vendor_handlers::update_vendor))
        .route("/{id}", delete(vendor_handlers::delete_vendor))
        .route("/{id}/brands", get(vendor_handlers::list_brands_by_vendor))
}

/// Creates the brands API router
pub fn create_brands_router() -> Router<DbState> {
    Router::new()
        .route("/", post(vendor_handlers::create_brand))
        .route("/{id}", get(vendor_handlers::get_brand))
        .route("/{id}", delete(vendor_handlers::delete_brand))
}

/// Creates the users API router
pub fn create_users_router() -> Router<DbState> {
    Router::new()
        .route("/", get(user_handlers::list_users))
        .route("/", post(user_handlers::create_user))
        .route("/{id}", get(user_handlers::get_user))
        .route("/{id}", put(user_handlers::update_user))
        .route("/{id}", delete(user_handlers::delete_user))
}

/// Assembles the full /api router over shared database state
pub fn create_api_router(state: DbState) -> Router {
    Router::new()
        .nest("/api/applications", create_applications_router())
        .nest("/api/reviews", create_reviews_router())
        .nest("/api/inspections", create_inspections_router())
        .nest("/api/foodtrucks", create_trucks_router())
        .nest("/api/menu-items", create_menu_items_router())
        .nest("/api/vendors", create_vendors_router())
        .nest("/api/brands", create_brands_router())
        .nest("/api/users", create_users_router())
        .route(
            "/api/stats/platform",
            get(inspection_handlers::platform_stats),
        )
        .route("/health", get(application_handlers::health_check))
        .with_state(state)
}

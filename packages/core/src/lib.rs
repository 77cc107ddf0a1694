// ABOUTME: Core constants and utilities for Curbside
// ABOUTME: Foundational package providing shared functionality across all Curbside packages

pub mod constants;
pub mod ids;

pub use constants::database_file;
pub use ids::{
    application_id, brand_id, inspection_id, menu_item_id, review_id, truck_id, user_id, vendor_id,
};

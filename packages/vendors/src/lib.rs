// ABOUTME: Vendor and brand records for Curbside
// ABOUTME: Plain ownership CRUD; the licensing workflow lives in curbside-workflow

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::{VendorError, VendorStorage};
pub use types::{Brand, BrandCreateInput, Vendor, VendorCreateInput, VendorUpdateInput};

// ABOUTME: Food truck and menu item records for Curbside
// ABOUTME: Mutation is gated on licensing approval; truck creation lives in curbside-workflow

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::{row_to_truck, TruckError, TruckStorage};
pub use types::{
    ApplicationStatus, DocumentRef, FoodTruck, FoodTruckCreateInput, FoodTruckUpdateInput,
    MenuItem, MenuItemCreateInput, MenuItemUpdateInput,
};

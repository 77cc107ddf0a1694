// ABOUTME: Application lifecycle and role-assignment workflow for the licensing platform
// ABOUTME: The engine runs the transactional state machine, the storage serves the read model

pub mod engine;
pub mod storage;
pub mod types;

pub use engine::{WorkflowEngine, WorkflowError};
pub use storage::WorkflowStorage;
pub use types::{
    Application, ApplicationSortBy, ApplicationWithDetails, FoodTruckWithOwner, Inspection,
    InspectionOutcome, InspectionResult, InspectorStats, PlatformStats, Review, ReviewDecision,
    ReviewStatus, ReviewerStats, SortDirection, terminal_ratio,
};

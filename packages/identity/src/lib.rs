// ABOUTME: Role-tagged users and capability checks for Curbside
// ABOUTME: Provides types and storage for the identity records the workflow binds to

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::UserStorage;
pub use types::{CallerIdentity, Capability, Role, User, UserCreateInput, UserUpdateInput};

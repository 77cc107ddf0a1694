// ABOUTME: Role and user type definitions
// ABOUTME: Roles are a closed enum dispatched through capability checks, never string comparisons

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Vendor,
    Admin,
    Inspector,
    Reviewer,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "VENDOR",
            Role::Admin => "ADMIN",
            Role::Inspector => "INSPECTOR",
            Role::Reviewer => "REVIEWER",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Whether this role grants the given capability.
    pub fn allows(&self, capability: Capability) -> bool {
        use Capability::*;
        match capability {
            AssignReviewer | AssignInspector => {
                matches!(self, Role::Admin | Role::SuperAdmin)
            }
            CompleteReview => matches!(self, Role::Reviewer | Role::Admin | Role::SuperAdmin),
            CompleteInspection => {
                matches!(self, Role::Inspector | Role::Admin | Role::SuperAdmin)
            }
            ManageTrucks => matches!(self, Role::Vendor | Role::Admin | Role::SuperAdmin),
            ManageUsers => matches!(self, Role::SuperAdmin),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VENDOR" => Ok(Role::Vendor),
            "ADMIN" => Ok(Role::Admin),
            "INSPECTOR" => Ok(Role::Inspector),
            "REVIEWER" => Ok(Role::Reviewer),
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// What a caller is allowed to do. Workflow operations name the capability
/// they need instead of matching on roles inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AssignReviewer,
    AssignInspector,
    CompleteReview,
    CompleteInspection,
    ManageTrucks,
    ManageUsers,
}

/// The identity of the caller, threaded explicitly through every core
/// operation. Produced by the transport layer from its auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
    pub role: Role,
}

impl CallerIdentity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreateInput {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdateInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [
            Role::Vendor,
            Role::Admin,
            Role::Inspector,
            Role::Reviewer,
            Role::SuperAdmin,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_only_super_admin_manages_users() {
        assert!(Role::SuperAdmin.allows(Capability::ManageUsers));
        for role in [Role::Vendor, Role::Admin, Role::Inspector, Role::Reviewer] {
            assert!(!role.allows(Capability::ManageUsers));
        }
    }

    #[test]
    fn test_assignment_is_admin_only() {
        assert!(Role::Admin.allows(Capability::AssignReviewer));
        assert!(Role::SuperAdmin.allows(Capability::AssignInspector));
        assert!(!Role::Reviewer.allows(Capability::AssignReviewer));
        assert!(!Role::Inspector.allows(Capability::AssignInspector));
        assert!(!Role::Vendor.allows(Capability::AssignReviewer));
    }

    #[test]
    fn test_caller_identity_dispatch() {
        let caller = CallerIdentity::new("user-1", Role::Reviewer);
        assert!(caller.can(Capability::CompleteReview));
        assert!(!caller.can(Capability::CompleteInspection));
    }
}

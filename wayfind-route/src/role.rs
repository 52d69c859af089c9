//! Accessibility roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use wayfind_graph::{Access, Node, NodeKind};

/// Who is asking for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Student,
    PwdStudent,
    Employee,
    Admin,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Student, Role::PwdStudent, Role::Employee, Role::Admin]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::PwdStudent => "pwd-student",
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::PwdStudent => "PWD Student",
            Role::Employee => "Employee",
            Role::Admin => "Admin",
        }
    }

    pub fn from_name(s: &str) -> Option<Role> {
        Role::all().iter().copied().find(|r| r.name() == s.trim())
    }

    /// Whether a route for this role may pass through `node`
    pub fn is_accessible(&self, node: &Node) -> bool {
        match self {
            Role::Student => node.access != Access::Employee,
            Role::PwdStudent => node.access != Access::Employee && node.kind != NodeKind::Stairs,
            Role::Employee | Role::Admin => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_name(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Free-function form of [`Role::is_accessible`]
pub fn is_accessible(role: Role, node: &Node) -> bool {
    role.is_accessible(node)
}

// SPDX-License-Identifier: MIT

//! User roles.

use serde::{Deserialize, Serialize};

/// Role of the signed-in user.
///
/// Set by a successful login, cleared on logout, never persisted — a reload
/// drops back to the role choice screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

// SPDX-License-Identifier: MIT

//! Login credential checking.
//!
//! `Authenticator` is a pluggable capability so a real identity system can
//! replace the illustrative pair-matching below without touching the view
//! controller or the access gate.

use crate::models::Role;

/// Maps a credential pair to a role, or rejects it.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}

/// Two fixed illustrative accounts, one per role.
///
/// This is placeholder matching for demo content, NOT a security boundary:
/// no hashing, no constant-time comparison, no account storage.
pub struct FixedCredentials;

const TEACHER_ACCOUNT: (&str, &str) = ("teacher@campus", "teach123");
const STUDENT_ACCOUNT: (&str, &str) = ("student@campus", "learn123");

impl Authenticator for FixedCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        match (username, password) {
            (u, p) if (u, p) == TEACHER_ACCOUNT => Some(Role::Teacher),
            (u, p) if (u, p) == STUDENT_ACCOUNT => Some(Role::Student),
            _ => None,
        }
    }
}

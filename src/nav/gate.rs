// SPDX-License-Identifier: MIT

//! Role-based access gate.

use crate::models::Role;
use crate::nav::View;

/// Outcome of a gate check. Denial redirects; it is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny { fallback: View },
}

/// Policy table mapping (role, target view) to a decision.
pub struct AccessGate;

impl AccessGate {
    /// Pure and deterministic: the decision depends on nothing but the
    /// arguments. Students may not enter the authoring views; everything
    /// else is open to both roles.
    pub fn can_enter(role: Role, target: View) -> GateDecision {
        match (role, target) {
            (Role::Student, View::AddEvent | View::AddScores) => GateDecision::Deny {
                fallback: View::dashboard_for(role),
            },
            _ => GateDecision::Allow,
        }
    }
}

// SPDX-License-Identifier: MIT

//! Named views of the application.

use crate::models::Role;

/// The fixed set of views. There is no terminal view; the application runs
/// until the host process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    InitialRoleChoice,
    Login,
    TeacherDashboard,
    StudentDashboard,
    EventCalendar,
    EventDetails,
    AddEvent,
    AddScores,
    ViewResults,
    NoticeBoard,
    StudentProfile,
}

impl View {
    /// All views, for exhaustive policy checks in tests.
    pub const ALL: [View; 11] = [
        View::InitialRoleChoice,
        View::Login,
        View::TeacherDashboard,
        View::StudentDashboard,
        View::EventCalendar,
        View::EventDetails,
        View::AddEvent,
        View::AddScores,
        View::ViewResults,
        View::NoticeBoard,
        View::StudentProfile,
    ];

    /// The dashboard a role lands on after login (and falls back to on a
    /// denied transition).
    pub fn dashboard_for(role: Role) -> View {
        match role {
            Role::Teacher => View::TeacherDashboard,
            Role::Student => View::StudentDashboard,
        }
    }
}

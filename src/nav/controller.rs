// SPDX-License-Identifier: MIT

//! View state machine.
//!
//! Every user action maps the current state to a next view; role-gated
//! targets pass through [`AccessGate`], which redirects rather than errors.
//! The controller owns the only global mutable state: the logged-in role and
//! the transient filtered-event payload for the details view.

use crate::auth::Authenticator;
use crate::models::{Event, Role};
use crate::nav::gate::{AccessGate, GateDecision};
use crate::nav::View;
use chrono::Datelike;

/// Application context: created at startup, mutated only by login/logout.
#[derive(Debug, Default)]
pub struct AppContext {
    pub role: Option<Role>,
}

/// User actions that drive transitions.
#[derive(Debug, Clone)]
pub enum NavAction {
    /// Pick a role on the initial screen; leads to the login form.
    ChooseRole(Role),
    /// Submit the login form.
    Login { username: String, password: String },
    /// Plain navigation click.
    Navigate(View),
    /// From the calendar: open the details view carrying the given month's
    /// events as a filtered payload.
    OpenMonthEvents {
        year: i32,
        month: u32,
        events: Vec<Event>,
    },
    /// Clear role and payload, back to the role choice.
    Logout,
}

/// Finite state machine over the named views.
pub struct ViewController {
    authenticator: Box<dyn Authenticator>,
    context: AppContext,
    view: View,
    /// Role picked on the initial screen, pending login.
    login_role: Option<Role>,
    /// Month-filtered events carried from the calendar into the details view.
    /// Cleared the moment the details view is left so stale filtered data
    /// cannot leak into a later direct visit.
    selected_events: Option<Vec<Event>>,
}

impl ViewController {
    pub fn new(authenticator: Box<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            context: AppContext::default(),
            view: View::InitialRoleChoice,
            login_role: None,
            selected_events: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn role(&self) -> Option<Role> {
        self.context.role
    }

    /// The filtered payload for the details view; `None` means the view was
    /// entered directly and should fall back to the full live collection.
    pub fn selected_events(&self) -> Option<&[Event]> {
        self.selected_events.as_deref()
    }

    /// Apply one user action and return the resulting view.
    pub fn apply(&mut self, action: NavAction) -> View {
        let target = match action {
            NavAction::ChooseRole(role) => {
                if self.view == View::InitialRoleChoice {
                    self.login_role = Some(role);
                    View::Login
                } else {
                    self.view
                }
            }
            NavAction::Login { username, password } => self.try_login(&username, &password),
            NavAction::Navigate(view) => view,
            NavAction::OpenMonthEvents {
                year,
                month,
                events,
            } => {
                if self.view == View::EventCalendar {
                    self.selected_events = Some(events_in_month(&events, year, month));
                    View::EventDetails
                } else {
                    self.view
                }
            }
            NavAction::Logout => {
                self.context.role = None;
                self.login_role = None;
                tracing::info!("logged out");
                View::InitialRoleChoice
            }
        };

        let next = self.gated(target);
        if self.view == View::EventDetails && next != View::EventDetails {
            self.selected_events = None;
        }
        self.view = next;
        next
    }

    fn try_login(&mut self, username: &str, password: &str) -> View {
        if self.view != View::Login {
            return self.view;
        }
        match self.authenticator.authenticate(username, password) {
            // The credentials must also match the role chosen on the
            // initial screen.
            Some(role) if self.login_role.map_or(true, |chosen| chosen == role) => {
                self.context.role = Some(role);
                self.login_role = None;
                tracing::info!(%role, "login succeeded");
                View::dashboard_for(role)
            }
            _ => {
                tracing::debug!("login rejected");
                self.view
            }
        }
    }

    /// Filter the target through the access gate.
    fn gated(&self, target: View) -> View {
        match self.context.role {
            Some(role) => match AccessGate::can_enter(role, target) {
                GateDecision::Allow => target,
                GateDecision::Deny { fallback } => {
                    // Silent redirect, not an error.
                    tracing::debug!(?target, ?fallback, "access denied, redirecting");
                    fallback
                }
            },
            // Before login only the entry views are reachable.
            None => match target {
                View::InitialRoleChoice | View::Login => target,
                _ => self.view,
            },
        }
    }
}

/// Events dated in the given month, ascending by date.
pub fn events_in_month(events: &[Event], year: i32, month: u32) -> Vec<Event> {
    let mut filtered: Vec<Event> = events
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .cloned()
        .collect();
    filtered.sort_by(|a, b| a.date.cmp(&b.date));
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FixedCredentials;
    use crate::models::seed::seed_events;
    use crate::models::EventCategory;
    use chrono::{NaiveDate, Utc};

    fn controller() -> ViewController {
        ViewController::new(Box::new(FixedCredentials))
    }

    fn login_as(ctl: &mut ViewController, role: Role) {
        ctl.apply(NavAction::ChooseRole(role));
        let (username, password) = match role {
            Role::Teacher => ("teacher@campus", "teach123"),
            Role::Student => ("student@campus", "learn123"),
        };
        ctl.apply(NavAction::Login {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    fn event_on(id: &str, date: (i32, u32, u32)) -> Event {
        Event {
            id: id.to_string(),
            title: format!("event {}", id),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: "d".to_string(),
            category: EventCategory::Other,
            created_at: Utc::now(),
            created_by: Role::Teacher,
        }
    }

    #[test]
    fn starts_at_role_choice_without_role() {
        let ctl = controller();
        assert_eq!(ctl.view(), View::InitialRoleChoice);
        assert_eq!(ctl.role(), None);
    }

    #[test]
    fn login_flow_lands_on_role_dashboard() {
        let mut ctl = controller();
        assert_eq!(ctl.apply(NavAction::ChooseRole(Role::Teacher)), View::Login);

        let next = ctl.apply(NavAction::Login {
            username: "teacher@campus".to_string(),
            password: "teach123".to_string(),
        });
        assert_eq!(next, View::TeacherDashboard);
        assert_eq!(ctl.role(), Some(Role::Teacher));
    }

    #[test]
    fn failed_login_stays_on_login_without_role() {
        let mut ctl = controller();
        ctl.apply(NavAction::ChooseRole(Role::Teacher));

        let next = ctl.apply(NavAction::Login {
            username: "teacher@campus".to_string(),
            password: "wrong".to_string(),
        });
        assert_eq!(next, View::Login);
        assert_eq!(ctl.role(), None);
    }

    #[test]
    fn student_credentials_rejected_for_teacher_choice() {
        let mut ctl = controller();
        ctl.apply(NavAction::ChooseRole(Role::Teacher));

        let next = ctl.apply(NavAction::Login {
            username: "student@campus".to_string(),
            password: "learn123".to_string(),
        });
        assert_eq!(next, View::Login);
        assert_eq!(ctl.role(), None);
    }

    #[test]
    fn student_is_redirected_from_authoring_views() {
        let mut ctl = controller();
        login_as(&mut ctl, Role::Student);

        assert_eq!(
            ctl.apply(NavAction::Navigate(View::AddEvent)),
            View::StudentDashboard
        );
        assert_eq!(
            ctl.apply(NavAction::Navigate(View::AddScores)),
            View::StudentDashboard
        );
        // Browsing views stay open.
        assert_eq!(
            ctl.apply(NavAction::Navigate(View::NoticeBoard)),
            View::NoticeBoard
        );
    }

    #[test]
    fn teacher_may_enter_authoring_views() {
        let mut ctl = controller();
        login_as(&mut ctl, Role::Teacher);

        assert_eq!(ctl.apply(NavAction::Navigate(View::AddEvent)), View::AddEvent);
        assert_eq!(
            ctl.apply(NavAction::Navigate(View::AddScores)),
            View::AddScores
        );
    }

    #[test]
    fn calendar_carries_month_events_sorted_ascending() {
        let mut ctl = controller();
        login_as(&mut ctl, Role::Student);
        ctl.apply(NavAction::Navigate(View::EventCalendar));

        let mut events = seed_events();
        events.push(event_on("late-november", (2025, 11, 30)));
        events.push(event_on("december", (2025, 12, 2)));

        let next = ctl.apply(NavAction::OpenMonthEvents {
            year: 2025,
            month: 11,
            events,
        });
        assert_eq!(next, View::EventDetails);

        let payload = ctl.selected_events().expect("payload set by calendar");
        let dates: Vec<_> = payload.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-11-14", "2025-11-28", "2025-11-30"]);
    }

    #[test]
    fn payload_cleared_when_leaving_details() {
        let mut ctl = controller();
        login_as(&mut ctl, Role::Student);
        ctl.apply(NavAction::Navigate(View::EventCalendar));
        ctl.apply(NavAction::OpenMonthEvents {
            year: 2025,
            month: 11,
            events: seed_events(),
        });
        assert!(ctl.selected_events().is_some());

        ctl.apply(NavAction::Navigate(View::NoticeBoard));
        assert!(ctl.selected_events().is_none());

        // A later direct visit sees no stale filter.
        ctl.apply(NavAction::Navigate(View::EventDetails));
        assert!(ctl.selected_events().is_none());
    }

    #[test]
    fn open_month_ignored_outside_calendar() {
        let mut ctl = controller();
        login_as(&mut ctl, Role::Student);
        ctl.apply(NavAction::Navigate(View::NoticeBoard));

        let next = ctl.apply(NavAction::OpenMonthEvents {
            year: 2025,
            month: 11,
            events: seed_events(),
        });
        assert_eq!(next, View::NoticeBoard);
        assert!(ctl.selected_events().is_none());
    }

    #[test]
    fn logout_resets_from_any_view() {
        for destination in [View::NoticeBoard, View::EventCalendar, View::AddScores] {
            let mut ctl = controller();
            login_as(&mut ctl, Role::Teacher);
            ctl.apply(NavAction::Navigate(destination));

            assert_eq!(ctl.apply(NavAction::Logout), View::InitialRoleChoice);
            assert_eq!(ctl.role(), None);
            assert!(ctl.selected_events().is_none());
        }
    }

    #[test]
    fn navigation_before_login_is_confined_to_entry_views() {
        let mut ctl = controller();
        assert_eq!(
            ctl.apply(NavAction::Navigate(View::NoticeBoard)),
            View::InitialRoleChoice
        );
        assert_eq!(ctl.apply(NavAction::Navigate(View::Login)), View::Login);
    }

    #[test]
    fn events_in_month_filters_and_sorts() {
        let events = vec![
            event_on("b", (2025, 11, 20)),
            event_on("a", (2025, 11, 5)),
            event_on("other-month", (2025, 10, 5)),
            event_on("other-year", (2024, 11, 5)),
        ];

        let november = events_in_month(&events, 2025, 11);
        let ids: Vec<_> = november.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}

// SPDX-License-Identifier: MIT

//! View navigation: the view state machine and the role-based access gate.

pub mod controller;
pub mod gate;
pub mod view;

pub use controller::{events_in_month, AppContext, NavAction, ViewController};
pub use gate::{AccessGate, GateDecision};
pub use view::View;

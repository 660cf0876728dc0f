// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod event;
pub mod notice;
pub mod role;
pub mod scores;
pub mod seed;

pub use event::{Event, EventCategory, NewEvent};
pub use notice::{NewNotice, Notice};
pub use role::Role;
pub use scores::{ScorePublication, ScoreRow, ScoreSheet};

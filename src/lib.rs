// SPDX-License-Identifier: MIT

//! Campus-Board: state and data-synchronization core for a school community
//! client.
//!
//! Teachers publish events, notices, and score sheets; students browse them.
//! This crate owns the non-presentational logic: the identity session, the
//! live collection sync against the document store, the role-based access
//! gate, and the view state machine. Rendering is left to a presentation
//! layer consuming the watch channels and controller state exposed here.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod nav;
pub mod retry;
pub mod sync;

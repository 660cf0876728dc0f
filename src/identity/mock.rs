// SPDX-License-Identifier: MIT

//! Mock identity provider for tests.

use crate::error::{AppError, Result};
use crate::identity::IdentityProvider;
use std::sync::Mutex;

/// Scriptable provider: each sign-in path either yields a fixed identity or
/// fails. Calls are recorded so tests can assert on the branch taken.
#[derive(Default)]
pub struct MockIdentity {
    known: Option<String>,
    custom_token_identity: Option<String>,
    anonymous_identity: Option<String>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockIdentity {
    /// Provider that already recognizes a signed-in identity.
    pub fn with_known_identity(uid: &str) -> Self {
        Self {
            known: Some(uid.to_string()),
            ..Self::default()
        }
    }

    /// Provider that only supports anonymous sign-in.
    pub fn anonymous_only(uid: &str) -> Self {
        Self {
            anonymous_identity: Some(uid.to_string()),
            ..Self::default()
        }
    }

    /// Provider that accepts a custom token sign-in.
    pub fn accepting_custom_token(uid: &str) -> Self {
        Self {
            custom_token_identity: Some(uid.to_string()),
            ..Self::default()
        }
    }

    /// Provider where every sign-in path fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Names of the provider methods invoked, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl IdentityProvider for MockIdentity {
    async fn known_identity(&self) -> Result<Option<String>> {
        self.record("known_identity");
        Ok(self.known.clone())
    }

    async fn sign_in_with_token(&self, _token: &str) -> Result<String> {
        self.record("sign_in_with_token");
        self.custom_token_identity
            .clone()
            .ok_or_else(|| AppError::Identity("custom token rejected".to_string()))
    }

    async fn sign_in_anonymously(&self) -> Result<String> {
        self.record("sign_in_anonymously");
        self.anonymous_identity
            .clone()
            .ok_or_else(|| AppError::Identity("anonymous sign-in disabled".to_string()))
    }
}

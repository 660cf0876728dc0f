// SPDX-License-Identifier: MIT

//! Firebase identity-toolkit REST client.
//!
//! Covers the two sign-in paths the session needs: anonymous sign-up and
//! custom-token sign-in. The identity token exposed to the rest of the crate
//! is the stable Firebase `localId` (uid).

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::identity::IdentityProvider;
use serde::Deserialize;
use std::sync::Mutex;

const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// Identity provider backed by the Firebase Auth REST API.
pub struct FirebaseIdentity {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Identity from an earlier successful sign-in in this process.
    cached_identity: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
}

impl FirebaseIdentity {
    /// Create the provider, validating its configuration.
    pub fn new(config: &Config) -> Result<Self> {
        if config.firebase_api_key.trim().is_empty() {
            return Err(AppError::Initialization(
                "Firebase API key is not configured".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: IDENTITY_TOOLKIT_BASE.to_string(),
            api_key: config.firebase_api_key.clone(),
            cached_identity: Mutex::new(None),
        })
    }

    async fn sign_in(&self, endpoint: &str, body: serde_json::Value) -> Result<String> {
        let url = format!("{}/accounts:{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!("HTTP {}: {}", status, text)));
        }

        let signed_in: SignInResponse = response
            .json()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        *self.cached_identity.lock().unwrap() = Some(signed_in.local_id.clone());
        Ok(signed_in.local_id)
    }
}

impl IdentityProvider for FirebaseIdentity {
    async fn known_identity(&self) -> Result<Option<String>> {
        Ok(self.cached_identity.lock().unwrap().clone())
    }

    async fn sign_in_with_token(&self, token: &str) -> Result<String> {
        self.sign_in(
            "signInWithCustomToken",
            serde_json::json!({ "token": token, "returnSecureToken": true }),
        )
        .await
    }

    async fn sign_in_anonymously(&self) -> Result<String> {
        self.sign_in("signUp", serde_json::json!({ "returnSecureToken": true }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_is_an_initialization_error() {
        let config = Config {
            firebase_api_key: "  ".to_string(),
            ..Config::default()
        };

        match FirebaseIdentity::new(&config) {
            Err(AppError::Initialization(_)) => {}
            other => panic!("expected Initialization error, got {:?}", other.err()),
        }
    }
}

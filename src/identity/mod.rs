// SPDX-License-Identifier: MIT

//! Identity session establishment.
//!
//! The provider is a pluggable capability; the session wraps it in an explicit
//! state machine (`Uninitialized → Initializing → Ready | Failed`) published
//! over a watch channel so downstream consumers can gate on readiness.

pub mod firebase;
pub mod mock;

pub use firebase::FirebaseIdentity;
pub use mock::MockIdentity;

use crate::error::Result;
use std::future::Future;
use tokio::sync::watch;

/// Authentication capability the session is established against.
pub trait IdentityProvider: Send + Sync {
    /// Identity from a previously recognized sign-in, if any.
    fn known_identity(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Sign in with a pre-issued custom token; returns the identity token.
    fn sign_in_with_token(&self, token: &str) -> impl Future<Output = Result<String>> + Send;

    /// Anonymous sign-in; returns the identity token.
    fn sign_in_anonymously(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Lifecycle of the identity session.
///
/// `Ready` is reached at most once and the token inside never changes for the
/// remainder of the process. A failed sign-in lands in `Failed`, not `Ready`:
/// readiness requires a usable identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready { identity_token: String },
    Failed { reason: String },
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready { .. })
    }

    pub fn identity_token(&self) -> Option<&str> {
        match self {
            SessionState::Ready { identity_token } => Some(identity_token),
            _ => None,
        }
    }
}

/// Session identity established once at startup.
pub struct IdentitySession {
    state: watch::Sender<SessionState>,
}

impl IdentitySession {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self { state }
    }

    /// Watch the session lifecycle.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    pub fn identity_token(&self) -> Option<String> {
        self.state.borrow().identity_token().map(str::to_string)
    }

    /// Establish the session, running the sign-in branches in order:
    ///
    /// 1. adopt an already recognized identity;
    /// 2. otherwise sign in with the configured bootstrap token, if any;
    /// 3. otherwise sign in anonymously.
    ///
    /// Runs at most once per session; repeated calls are no-ops that return
    /// the current state.
    pub async fn establish<P: IdentityProvider>(
        &self,
        provider: &P,
        bootstrap_token: Option<&str>,
    ) -> SessionState {
        if !matches!(self.state(), SessionState::Uninitialized) {
            tracing::warn!("session already established; ignoring repeated establish call");
            return self.state();
        }

        self.state.send_replace(SessionState::Initializing);

        let outcome = match provider.known_identity().await {
            Ok(Some(identity_token)) => {
                tracing::debug!("adopting previously recognized identity");
                Ok(identity_token)
            }
            Ok(None) => match bootstrap_token {
                Some(token) => provider.sign_in_with_token(token).await,
                None => provider.sign_in_anonymously().await,
            },
            Err(err) => Err(err),
        };

        let next = match outcome {
            Ok(identity_token) => {
                tracing::info!("identity session ready");
                SessionState::Ready { identity_token }
            }
            Err(err) => {
                tracing::error!(error = %err, "identity session failed");
                SessionState::Failed {
                    reason: err.to_string(),
                }
            }
        };

        self.state.send_replace(next.clone());
        next
    }
}

impl Default for IdentitySession {
    fn default() -> Self {
        Self::new()
    }
}

//! Session Controller.
//!
//! Tracks whether the user is signed in. A token is only trusted after the
//! backend has verified it; any verification failure clears the stored token.

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::services::api_client::NotesBackend;
use crate::services::token_store::TokenStoreTrait;
use crate::types::errors::AuthError;
use crate::types::session::SessionState;
use crate::types::user::UserInfo;

/// Trait defining session operations.
#[async_trait(?Send)]
pub trait SessionControllerTrait {
    fn state(&self) -> &SessionState;
    fn user(&self) -> Option<&UserInfo>;
    fn is_authenticated(&self) -> bool;
    /// Verifies a previously stored token, if any. Run once on startup.
    async fn restore(&mut self) -> SessionState;
    /// Stores the identity provider's token and verifies it.
    async fn login(&mut self, token: &str) -> Result<UserInfo, AuthError>;
    /// Drops the stored token. The session ends even if clearing storage fails.
    fn logout(&mut self) -> Result<(), AuthError>;
}

/// Session state machine backed by a token store and the verification endpoint.
pub struct SessionController {
    backend: Arc<dyn NotesBackend>,
    tokens: Box<dyn TokenStoreTrait>,
    state: SessionState,
}

impl SessionController {
    pub fn new(backend: Arc<dyn NotesBackend>, tokens: Box<dyn TokenStoreTrait>) -> Self {
        Self {
            backend,
            tokens,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn token_store(&self) -> &dyn TokenStoreTrait {
        self.tokens.as_ref()
    }

    /// Runs verification for `token`, leaving the controller authenticated or
    /// signed out with the token cleared.
    async fn verify(&mut self, token: &str) -> Result<UserInfo, AuthError> {
        self.state = SessionState::Verifying;
        let err = match self.backend.verify_token(token).await {
            Ok(Some(user)) => {
                info!("session verified for user {}", user.id);
                self.state = SessionState::Authenticated(user.clone());
                return Ok(user);
            }
            Ok(None) => AuthError::InvalidToken,
            Err(e) => AuthError::VerificationFailed(e.to_string()),
        };

        warn!("token verification failed: {}", err);
        if let Err(e) = self.tokens.clear_token() {
            warn!("could not clear rejected token: {}", e);
        }
        self.state = SessionState::Unauthenticated;
        Err(err)
    }
}

#[async_trait(?Send)]
impl SessionControllerTrait for SessionController {
    fn state(&self) -> &SessionState {
        &self.state
    }

    fn user(&self) -> Option<&UserInfo> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    async fn restore(&mut self) -> SessionState {
        let token = match self.tokens.load_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.state = SessionState::Unauthenticated;
                return self.state.clone();
            }
            Err(e) => {
                warn!("could not read stored token: {}", e);
                self.state = SessionState::Unauthenticated;
                return self.state.clone();
            }
        };
        let _ = self.verify(&token).await;
        self.state.clone()
    }

    async fn login(&mut self, token: &str) -> Result<UserInfo, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        self.tokens
            .save_token(token)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        self.verify(token).await
    }

    fn logout(&mut self) -> Result<(), AuthError> {
        self.state = SessionState::Unauthenticated;
        info!("signed out");
        self.tokens
            .clear_token()
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}

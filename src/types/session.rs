use serde::{Deserialize, Serialize};

use super::user::UserInfo;

/// Authentication state of the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    /// A stored or freshly issued token is being checked by the backend.
    Verifying,
    Authenticated(UserInfo),
}

/// Body of `POST /auth/verify-token`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyTokenRequest {
    pub google_token: String,
}

/// Response of `POST /auth/verify-token`. `user` is absent for invalid tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyTokenResponse {
    #[serde(default)]
    pub user: Option<UserInfo>,
}

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user as returned by the backend after token verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub picture: String,
}

pub mod auth;
pub mod diary;

use serde::Deserialize;

use crate::error::ApiError;

/// `?username=` query used by the endpoints that scope data to a user.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

impl UserQuery {
    /// The original contract reports a missing username as a client error,
    /// not an empty result.
    pub fn require(&self) -> Result<&str, ApiError> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Username is required".to_string()))
    }
}

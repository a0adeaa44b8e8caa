use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use registrovivo_db::models::User;
use registrovivo_services::auth;
use registrovivo_services::dao::base::DaoError;

use crate::{error::ApiError, routes::UserQuery, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    // Stored as given (trimmed); no format check, anything non-empty counts.
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            created_at: user.created_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    // Validate the trimmed values; surrounding whitespace never counts
    // toward the minimum lengths and is not stored.
    let body = RegisterRequest {
        username: body.username.trim().to_string(),
        email: body
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty()),
        password: body.password,
    };
    body.validate()?;

    if state.users.username_exists(&body.username).await? {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(&body.password)?;
    let user = match state
        .users
        .create(body.username, body.email, password_hash)
        .await
    {
        Ok(user) => user,
        // Lost the race against a concurrent register with the same name.
        Err(DaoError::DuplicateKey(_)) => {
            return Err(ApiError::BadRequest("User already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "User registered successfully",
            "user": UserResponse::from(user),
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    // Unknown user and wrong password are indistinguishable to the caller.
    let user = match state.users.find_by_username(body.username.trim()).await {
        Ok(user) => user,
        Err(DaoError::NotFound) => {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    auth::verify_password(&body.password, &user.password_hash)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Login successful",
        "user": UserResponse::from(user),
    })))
}

pub async fn current_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = query.require()?;

    let user = match state.users.find_by_username(username).await {
        Ok(user) => user,
        Err(DaoError::NotFound) => {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(user),
    })))
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use registrovivo_db::models::{DiaryEntry, User};
use registrovivo_services::dao::base::DaoError;

use crate::{error::ApiError, routes::UserQuery, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub username: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<DiaryEntry> for EntryResponse {
    fn from(entry: DiaryEntry) -> Self {
        Self {
            id: entry.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: entry.title,
            content: entry.content,
            created_at: entry.created_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

async fn resolve_user(state: &AppState, username: &str) -> Result<User, ApiError> {
    match state.users.find_by_username(username).await {
        Ok(user) => Ok(user),
        Err(DaoError::NotFound) => Err(ApiError::NotFound("User not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

fn parse_entry_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid entry id".to_string()))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = query.require()?;
    let user = resolve_user(&state, username).await?;

    let entries = state
        .entries
        .find_by_user(user.id.ok_or_else(missing_id)?)
        .await?;
    let entries: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "entries": entries,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = query.require()?;
    let user = resolve_user(&state, username).await?;
    let entry_id = parse_entry_id(&entry_id)?;

    let entry = match state
        .entries
        .find_for_user(entry_id, user.id.ok_or_else(missing_id)?)
        .await
    {
        Ok(entry) => entry,
        Err(DaoError::NotFound) => {
            return Err(ApiError::NotFound("Entry not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "entry": EntryResponse::from(entry),
    })))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let username = body
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Username is required".to_string()))?;

    let title = body.title.as_deref().map(str::trim).unwrap_or_default();
    let content = body.content.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }

    let user = resolve_user(&state, username).await?;
    let entry = state
        .entries
        .create(
            user.id.ok_or_else(missing_id)?,
            title.to_string(),
            content.to_string(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Entry created successfully",
            "entry": EntryResponse::from(entry),
        })),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = query.require()?;
    let user = resolve_user(&state, username).await?;
    let entry_id = parse_entry_id(&entry_id)?;

    let deleted = state
        .entries
        .delete_for_user(entry_id, user.id.ok_or_else(missing_id)?)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Entry not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Entry deleted successfully",
    })))
}

fn missing_id() -> ApiError {
    ApiError::Internal("stored user is missing its _id".to_string())
}

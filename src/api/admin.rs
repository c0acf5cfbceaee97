//! Admin panel endpoints.
//!
//! Everything except the knock, login and logout routes sits behind the
//! session layer in `create_router`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{current_revision, error, success, ApiResult};
use crate::auth::{session_token, KnockOutcome};
use crate::errors::AppError;
use crate::models::{ConfigField, DeleteOutcome, Post, PostDraft, SiteConfig};
use crate::AppState;

/// Request body for the hidden shortcut.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockRequest {
    /// Identifies one page load; a reload sends a new id
    pub page_id: String,
}

/// Request body for entering the admin panel.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Session handed to the admin panel after login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub token: String,
}

/// Request body for editing one configuration field.
#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub value: String,
}

/// Request body for changing the admin password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current: String,
    pub next: String,
    pub confirm: String,
}

/// POST /api/admin/knock - Count a tap on the hidden shortcut.
pub async fn knock(
    State(state): State<AppState>,
    Json(request): Json<KnockRequest>,
) -> ApiResult<KnockOutcome> {
    let revision_id = current_revision(&state).await;

    if request.page_id.trim().is_empty() {
        return error(
            AppError::Validation("pageId is required".to_string()),
            revision_id,
        );
    }

    success(state.knocks.knock(&request.page_id).await, revision_id)
}

/// POST /api/admin/session - Check the password and open a session.
pub async fn open_session(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionInfo> {
    let revision_id = current_revision(&state).await;

    if !state.site.authenticate(&request.password).await {
        tracing::warn!("Rejected admin login attempt");
        return error(AppError::InvalidPassword, revision_id);
    }

    let token = state.sessions.open().await;
    tracing::info!("Admin session opened");
    success(SessionInfo { token }, revision_id)
}

/// DELETE /api/admin/session - Leave the admin panel.
pub async fn close_session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<bool> {
    let revision_id = current_revision(&state).await;

    let Some(token) = session_token(&headers) else {
        return error(
            AppError::Unauthorized("Admin session required".to_string()),
            revision_id,
        );
    };

    success(state.sessions.close(&token).await, revision_id)
}

/// GET /api/admin/config - Full configuration, password included.
pub async fn get_admin_config(State(state): State<AppState>) -> ApiResult<SiteConfig> {
    let revision_id = current_revision(&state).await;
    success(state.site.config().await, revision_id)
}

/// PUT /api/admin/config/fields/:name - Replace one configuration field.
pub async fn update_config_field(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<UpdateFieldRequest>,
) -> ApiResult<SiteConfig> {
    let field = match parse_field(&name) {
        Ok(field) => field,
        Err(e) => return error(e, current_revision(&state).await),
    };

    match state.site.update_field(field, request.value).await {
        Ok(saved) => success(saved.value, saved.revision_id),
        Err(e) => error(e, current_revision(&state).await),
    }
}

/// PUT /api/admin/config/images/:field - Store the request body as an inline image.
pub async fn upload_config_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<SiteConfig> {
    let field = match parse_field(&name) {
        Ok(field) => field,
        Err(e) => return error(e, current_revision(&state).await),
    };

    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match state.site.set_image(field, mime, &body).await {
        Ok(saved) => success(saved.value, saved.revision_id),
        Err(e) => error(e, current_revision(&state).await),
    }
}

/// PUT /api/admin/password - Change the admin password.
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    match state
        .site
        .change_password(&request.current, &request.next, &request.confirm)
        .await
    {
        Ok(new_revision) => success((), new_revision),
        Err(e) => error(e, current_revision(&state).await),
    }
}

/// POST /api/admin/posts - Publish a new post.
pub async fn create_post(
    State(state): State<AppState>,
    Json(draft): Json<PostDraft>,
) -> ApiResult<Post> {
    match state.site.add_post(draft).await {
        Ok(saved) => success(saved.value, saved.revision_id),
        Err(e) => error(e, current_revision(&state).await),
    }
}

/// DELETE /api/admin/posts/:id - Remove a post; unknown ids are a no-op.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteOutcome> {
    match state.site.delete_post(&id).await {
        Ok(saved) => success(
            DeleteOutcome {
                id,
                removed: saved.value,
            },
            saved.revision_id,
        ),
        Err(e) => error(e, current_revision(&state).await),
    }
}

fn parse_field(name: &str) -> Result<ConfigField, AppError> {
    ConfigField::from_str(name).ok_or_else(|| {
        if name == "adminPassword" {
            AppError::Validation(
                "adminPassword can only be changed through /api/admin/password".to_string(),
            )
        } else {
            AppError::Validation(format!("Unknown config field {}", name))
        }
    })
}

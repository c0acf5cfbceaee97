//! Contact form endpoint.

use axum::{extract::State, Json};

use super::{current_revision, error, success, ApiResult};
use crate::contact::ContactMessage;
use crate::AppState;

/// POST /api/contact - Forward an inquiry to the form service.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(message): Json<ContactMessage>,
) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    match state.contact.forward(&message).await {
        Ok(()) => success((), revision_id),
        Err(e) => error(e, revision_id),
    }
}

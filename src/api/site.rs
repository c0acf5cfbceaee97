//! Public content endpoints.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};

use super::{current_revision, error, success, ApiResult};
use crate::models::{Content, Post, RevisionInfo, SiteConfig};
use crate::AppState;

/// GET /api/site - Configuration and posts in one call.
pub async fn get_site(State(state): State<AppState>) -> ApiResult<Content> {
    let revision_id = current_revision(&state).await;
    success(state.site.public_content().await, revision_id)
}

/// GET /api/site/config - Public site configuration.
pub async fn get_public_config(State(state): State<AppState>) -> ApiResult<SiteConfig> {
    let revision_id = current_revision(&state).await;
    success(state.site.config().await.redacted(), revision_id)
}

/// GET /api/posts - All posts, most recently added first.
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let revision_id = current_revision(&state).await;
    success(state.site.posts().await, revision_id)
}

/// GET /api/revision - Current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    match state.site.store().get_revision_info().await {
        Ok(info) => {
            let revision_id = info.revision_id;
            success(info, revision_id)
        }
        Err(e) => error(e, 0),
    }
}

/// GET /api/events - Server-sent `content` events after every save.
pub async fn content_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let changes = BroadcastStream::new(state.site.store().subscribe());

    let stream = changes.filter_map(|change| match change {
        Ok(change) => match Event::default().event("content").json_data(&change) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!("Failed to encode content event: {}", e);
                None
            }
        },
        // The client missed changes; tell it to refetch everything
        Err(BroadcastStreamRecvError::Lagged(skipped)) => Some(Ok(Event::default()
            .event("resync")
            .data(skipped.to_string()))),
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

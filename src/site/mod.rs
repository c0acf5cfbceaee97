//! Site service: the in-memory content documents and every operation on them.
//!
//! All mutations go through a single write lock, persist the new document
//! first and only then replace the in-memory copy, so a failed save leaves
//! the served content untouched.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::auth::constant_time_compare;
use crate::db::ContentStore;
use crate::errors::{AppError, PasswordError};
use crate::models::{
    ConfigField, Content, Post, PostDraft, SiteConfig, DEFAULT_POST_IMAGE,
};

/// Shortest admin password accepted by a password change.
pub const MIN_PASSWORD_LEN: usize = 4;

/// A value that has just been persisted, with the revision it produced.
#[derive(Debug, Clone)]
pub struct Saved<T> {
    pub value: T,
    pub revision_id: i64,
}

/// Owner of the site configuration and post list.
pub struct SiteService {
    store: ContentStore,
    content: RwLock<Content>,
}

impl SiteService {
    /// Load the persisted documents (or defaults) into memory.
    pub async fn open(store: ContentStore) -> Self {
        let content = store.load().await;
        tracing::info!(
            company = %content.config.company_name,
            posts = content.posts.len(),
            "Loaded site content"
        );

        Self {
            store,
            content: RwLock::new(content),
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Both documents with the admin password removed.
    pub async fn public_content(&self) -> Content {
        self.content.read().await.redacted()
    }

    /// Full configuration, including the admin password.
    pub async fn config(&self) -> SiteConfig {
        self.content.read().await.config.clone()
    }

    /// All posts in storage order (most recently added first).
    pub async fn posts(&self) -> Vec<Post> {
        self.content.read().await.posts.clone()
    }

    /// True iff `candidate` equals the stored (or default) admin password.
    pub async fn authenticate(&self, candidate: &str) -> bool {
        let content = self.content.read().await;
        constant_time_compare(candidate, content.config.effective_password())
    }

    /// Replace the admin password after checking confirmation, current password and length.
    pub async fn change_password(
        &self,
        current: &str,
        next: &str,
        confirm: &str,
    ) -> Result<i64, AppError> {
        let mut content = self.content.write().await;

        if next != confirm {
            return Err(PasswordError::Mismatch.into());
        }
        if !constant_time_compare(current, content.config.effective_password()) {
            return Err(PasswordError::WrongCurrent.into());
        }
        if next.chars().count() < MIN_PASSWORD_LEN {
            return Err(PasswordError::TooShort.into());
        }

        let config = SiteConfig {
            admin_password: Some(next.to_string()),
            ..content.config.clone()
        };
        let revision_id = self.store.save_config(&config).await?;
        content.config = config;

        tracing::info!(revision_id, "Admin password changed");
        Ok(revision_id)
    }

    /// Replace one text or image field of the configuration.
    pub async fn update_field(
        &self,
        field: ConfigField,
        value: String,
    ) -> Result<Saved<SiteConfig>, AppError> {
        let mut content = self.content.write().await;

        let config = content.config.with_field(field, value);
        let revision_id = self.store.save_config(&config).await?;
        content.config = config.clone();

        tracing::info!(field = field.as_str(), revision_id, "Site config field updated");
        Ok(Saved {
            value: config,
            revision_id,
        })
    }

    /// Store an uploaded image inline in one of the image fields.
    pub async fn set_image(
        &self,
        field: ConfigField,
        mime: &str,
        bytes: &[u8],
    ) -> Result<Saved<SiteConfig>, AppError> {
        if !field.is_image() {
            return Err(AppError::Validation(format!(
                "{} is not an image field",
                field.as_str()
            )));
        }
        let data_url = encode_data_url(mime, bytes)?;

        tracing::debug!(field = field.as_str(), bytes = bytes.len(), "Inlining uploaded image");
        self.update_field(field, data_url).await
    }

    /// Validate a draft and put the new post at the front of the list.
    pub async fn add_post(&self, draft: PostDraft) -> Result<Saved<Post>, AppError> {
        if draft.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if draft.content.trim().is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }

        let mut content = self.content.write().await;

        let now = Utc::now();
        let post = Post {
            id: next_post_id(&content.posts, now.timestamp_millis()),
            title: draft.title,
            category: draft.category.unwrap_or_default(),
            date: now.format("%Y-%m-%d").to_string(),
            content: draft.content,
            image_url: draft
                .image_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_POST_IMAGE.to_string()),
        };

        let mut posts = Vec::with_capacity(content.posts.len() + 1);
        posts.push(post.clone());
        posts.extend(content.posts.iter().cloned());

        let revision_id = self.store.save_posts(&posts).await?;
        content.posts = posts;

        tracing::info!(
            id = %post.id,
            category = post.category.as_str(),
            revision_id,
            "Post added"
        );
        Ok(Saved {
            value: post,
            revision_id,
        })
    }

    /// Remove the first post with `id`. Absent ids change nothing.
    pub async fn delete_post(&self, id: &str) -> Result<Saved<bool>, AppError> {
        let mut content = self.content.write().await;

        let Some(index) = content.posts.iter().position(|p| p.id == id) else {
            tracing::debug!(id, "Delete requested for unknown post");
            return Ok(Saved {
                value: false,
                revision_id: self.store.get_revision_id().await?,
            });
        };

        let mut posts = content.posts.clone();
        posts.remove(index);

        let revision_id = self.store.save_posts(&posts).await?;
        content.posts = posts;

        tracing::info!(id, revision_id, "Post deleted");
        Ok(Saved {
            value: true,
            revision_id,
        })
    }
}

/// Millisecond timestamp id, bumped past any id already in the list.
fn next_post_id(posts: &[Post], now_ms: i64) -> String {
    let mut candidate = now_ms;
    while posts.iter().any(|p| p.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

/// Encode an uploaded file as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> Result<String, AppError> {
    let mime = mime.split(';').next().unwrap_or_default().trim();
    if !mime.starts_with("image/") || mime.len() == "image/".len() {
        return Err(AppError::Validation(format!(
            "Unsupported image type {:?}",
            mime
        )));
    }
    if bytes.is_empty() {
        return Err(AppError::Validation("Image file is empty".to_string()));
    }

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

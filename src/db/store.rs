//! Content store: persisted key-value access to the site documents.
//!
//! Each save replaces the whole document, bumps the revision and notifies
//! subscribers. Reads never fail the caller; unreadable content is replaced
//! by the built-in defaults.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{Row, SqlitePool};
use tokio::sync::broadcast;

use crate::errors::AppError;
use crate::models::{seed_posts, Content, ContentChange, Document, Post, RevisionInfo, SiteConfig};

/// Storage key of the site configuration document.
pub const SITE_CONFIG_KEY: &str = "farmland.siteConfig";
/// Storage key of the post list document.
pub const POSTS_KEY: &str = "farmland.posts";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Persisted home of the site configuration and the post list.
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
    changes: broadcast::Sender<ContentChange>,
}

impl ContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { pool, changes }
    }

    /// Read both documents, substituting defaults for anything missing or unreadable.
    pub async fn load(&self) -> Content {
        let config = self
            .read_document::<SiteConfig>(SITE_CONFIG_KEY)
            .await
            .unwrap_or_default();
        let posts = self
            .read_document::<Vec<Post>>(POSTS_KEY)
            .await
            .unwrap_or_else(seed_posts);

        Content { config, posts }
    }

    /// Replace the stored site configuration. Returns the new revision.
    pub async fn save_config(&self, config: &SiteConfig) -> Result<i64, AppError> {
        self.write_document(SITE_CONFIG_KEY, Document::SiteConfig, config)
            .await
    }

    /// Replace the stored post list. Returns the new revision.
    pub async fn save_posts(&self, posts: &[Post]) -> Result<i64, AppError> {
        self.write_document(POSTS_KEY, Document::Posts, posts).await
    }

    /// Receive a notification after every successful save.
    pub fn subscribe(&self) -> broadcast::Receiver<ContentChange> {
        self.changes.subscribe()
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    async fn read_document<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let row = match sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
        {
            Ok(row) => row?,
            Err(e) => {
                tracing::error!(key, "Failed to read stored document, using defaults: {}", e);
                return None;
            }
        };

        let raw: String = row.get("value");
        match serde_json::from_str(&raw) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!(key, "Discarding unreadable stored document: {}", e);
                None
            }
        }
    }

    async fn write_document<T: Serialize + ?Sized>(
        &self,
        key: &str,
        document: Document,
        value: &T,
    ) -> Result<i64, AppError> {
        let json = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(&json)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&mut *tx)
            .await?;
        let revision_id: i64 = row.get("revision_id");

        tx.commit().await?;

        tracing::debug!(key, revision_id, bytes = json.len(), "Saved document");

        // Nobody listening is fine
        let _ = self.changes.send(ContentChange {
            document,
            revision_id,
        });

        Ok(revision_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{ConfigField, PostCategory};
    use tempfile::TempDir;

    async fn open_store() -> (ContentStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("store.sqlite"))
            .await
            .expect("Failed to init DB");
        (ContentStore::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_empty_store_loads_defaults() {
        let (store, _dir) = open_store().await;

        let content = store.load().await;
        assert_eq!(content, Content::default());
        assert_eq!(content.config.company_name, "FARMLAND");
        assert_eq!(content.posts.len(), 3);
        assert_eq!(store.get_revision_id().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let (store, _dir) = open_store().await;

        let config = SiteConfig::default()
            .with_field(ConfigField::CompanyName, "팜랜드".to_string())
            .with_field(ConfigField::HeroTitle, "첫 줄\n둘째 줄".to_string());
        store.save_config(&config).await.unwrap();

        assert_eq!(store.load().await.config, config);
    }

    #[tokio::test]
    async fn test_posts_round_trip_including_empty_list() {
        let (store, _dir) = open_store().await;

        let posts = vec![Post {
            id: "42".to_string(),
            title: "T".to_string(),
            category: PostCategory::Press,
            date: "2026-02-01".to_string(),
            content: "C".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
        }];
        store.save_posts(&posts).await.unwrap();
        assert_eq!(store.load().await.posts, posts);

        // An empty stored list is a real value, not "absent"
        store.save_posts(&[]).await.unwrap();
        assert!(store.load().await.posts.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_documents_fall_back_to_defaults() {
        let (store, _dir) = open_store().await;

        for key in [SITE_CONFIG_KEY, POSTS_KEY] {
            sqlx::query("INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)")
                .bind(key)
                .bind("{not json")
                .bind("2026-01-01T00:00:00Z")
                .execute(&store.pool)
                .await
                .unwrap();
        }

        assert_eq!(store.load().await, Content::default());
    }

    #[tokio::test]
    async fn test_saves_bump_revision_and_notify() {
        let (store, _dir) = open_store().await;
        let mut changes = store.subscribe();

        let first = store.save_config(&SiteConfig::default()).await.unwrap();
        let second = store.save_posts(&seed_posts()).await.unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let change = changes.recv().await.unwrap();
        assert_eq!(change.document, Document::SiteConfig);
        assert_eq!(change.revision_id, 1);
        let change = changes.recv().await.unwrap();
        assert_eq!(change.document, Document::Posts);
        assert_eq!(change.revision_id, 2);

        let info = store.get_revision_info().await.unwrap();
        assert_eq!(info.revision_id, 2);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (store, _dir) = open_store().await;

        let a = SiteConfig::default().with_field(ConfigField::Address, "A".to_string());
        let b = SiteConfig::default().with_field(ConfigField::Address, "B".to_string());
        store.save_config(&a).await.unwrap();
        store.save_config(&b).await.unwrap();

        assert_eq!(store.load().await.config.address, "B");
    }
}

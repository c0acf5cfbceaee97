//! Whole-site content snapshot and change notifications.

use serde::{Deserialize, Serialize};

use super::{seed_posts, Post, SiteConfig};

/// The two persisted documents, as held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub config: SiteConfig,
    pub posts: Vec<Post>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            config: SiteConfig::default(),
            posts: seed_posts(),
        }
    }
}

impl Content {
    /// Copy safe to hand to the public site.
    pub fn redacted(&self) -> Self {
        Self {
            config: self.config.redacted(),
            posts: self.posts.clone(),
        }
    }
}

/// Which persisted document a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Document {
    SiteConfig,
    Posts,
}

/// Published to subscribers after every successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChange {
    pub document: Document,
    pub revision_id: i64,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}

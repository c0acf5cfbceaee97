//! News post model matching the front end's Post interface.

use serde::{Deserialize, Serialize};

/// Image used when a post is created without one.
pub const DEFAULT_POST_IMAGE: &str = "https://picsum.photos/800/600";

/// Kind of announcement a post represents.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostCategory {
    #[default]
    News,
    Press,
    SocialContribution,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCategory::News => "NEWS",
            PostCategory::Press => "PRESS",
            PostCategory::SocialContribution => "SOCIAL_CONTRIBUTION",
        }
    }
}

/// A news, press or social-contribution entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: PostCategory,
    /// Creation date, `YYYY-MM-DD`
    pub date: String,
    pub content: String,
    pub image_url: String,
}

/// Request body for creating a post; id and date are assigned by the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<PostCategory>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Result of a delete request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub id: String,
    pub removed: bool,
}

/// Posts shown on a fresh installation.
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            id: "1".to_string(),
            title: "2026년 B2B 사업 영역 전면 확대 및 파트너십 강화".to_string(),
            category: PostCategory::News,
            date: "2026-01-01".to_string(),
            content: "기업 급식 및 대형 외식 프랜차이즈 대상 공급망을 확충하고 전처리 시스템을 고도화합니다. 안정적인 식자재 공급을 통해 기업 고객의 든든한 비즈니스 파트너로 도약하겠습니다.".to_string(),
            image_url: "https://images.unsplash.com/photo-1542601906990-b4d3fb778b09?q=80&w=2013&auto=format&fit=crop".to_string(),
        },
        Post {
            id: "2".to_string(),
            title: "신선 편의 전처리 시스템 도입".to_string(),
            category: PostCategory::Press,
            date: "2026-01-08".to_string(),
            content: "세척, 절단, 포장 등 맞춤형 전처리 서비스를 통해 조리 시간 단축과 인건비 절감을 실현합니다. 철저한 위생 공정을 거친 Ready-to-Use 식자재로 효율을 극대화하십시오.".to_string(),
            image_url: "https://images.unsplash.com/photo-1581092160562-40aa08e78837?q=80&w=2070&auto=format&fit=crop".to_string(),
        },
        Post {
            id: "3".to_string(),
            title: "지역 농가와 함께 성장하는 상생 협력 프로젝트".to_string(),
            category: PostCategory::SocialContribution,
            date: "2025-12-28".to_string(),
            content: "지역 농산물 우선 구매와 계약 재배를 통해 농가에는 안정적인 판로를 제공하고, 소비자에게는 최상의 신선함을 전달합니다. 지역 사회와 함께 웃는 지속 가능한 경영을 실천합니다.".to_string(),
            image_url: "https://images.unsplash.com/photo-1464226184884-fa280b87c399?q=80&w=2070&auto=format&fit=crop".to_string(),
        },
    ]
}

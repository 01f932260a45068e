//! Generated content records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A piece of text or image produced for a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedContent {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "text")]
    pub content_type: String,
    #[schema(example = "Generated Text")]
    pub title: Option<String>,
    pub text: Option<String>,
    pub image_path: Option<String>,
    #[serde(rename = "content_metadata")]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Content fields supplied by the caller. The owner comes from the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewContent {
    pub content_type: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub image_path: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewContent {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

//! Q&A records from the `questions` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::library_item::{epoch, ItemId};

/// A question with its answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: ItemId,

    /// Question text
    #[serde(default)]
    pub question: String,

    /// Answer text
    #[serde(default)]
    pub answer: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub view_count: u64,

    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            question: question.into(),
            answer: answer.into(),
            category: String::new(),
            tags: Vec::new(),
            view_count: 0,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

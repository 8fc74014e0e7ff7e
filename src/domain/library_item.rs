//! Library items: browsable videos, audios, articles and books.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque record identifier assigned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of library content
///
/// Decoding fails for any other value, so an unrecognized kind never
/// reaches a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Video,
    Audio,
    Article,
    Book,
}

impl MediaType {
    /// All kinds in tab order
    pub const ALL: [MediaType; 4] = [
        MediaType::Video,
        MediaType::Audio,
        MediaType::Article,
        MediaType::Book,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Article => "article",
            MediaType::Book => "book",
        }
    }

    /// Plural label used on the tab strip
    pub fn tab_label(&self) -> &'static str {
        match self {
            MediaType::Video => "Videos",
            MediaType::Audio => "Audios",
            MediaType::Article => "Articles",
            MediaType::Book => "Books",
        }
    }

    /// Whether items of this kind play inline (and so are lazily mounted)
    pub fn is_playable(&self) -> bool {
        matches!(self, MediaType::Video | MediaType::Audio)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "video" | "videos" => Ok(MediaType::Video),
            "audio" | "audios" => Ok(MediaType::Audio),
            "article" | "articles" => Ok(MediaType::Article),
            "book" | "books" => Ok(MediaType::Book),
            _ => anyhow::bail!("Unknown media type: {}", s),
        }
    }
}

/// A browsable content record from the `library_items` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub id: ItemId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Kind of content (required)
    #[serde(rename = "type")]
    pub media_type: MediaType,

    #[serde(default)]
    pub author: String,

    /// Content URL (media source or external link)
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub thumbnail_url: String,

    /// Display string such as "12:30" or "45 min"
    #[serde(default)]
    pub duration: String,

    #[serde(default)]
    pub category: String,

    /// Tags in display order
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub view_count: u64,

    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl LibraryItem {
    /// Create an item with just the required fields
    pub fn new(id: impl Into<String>, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            title: title.into(),
            description: String::new(),
            media_type,
            author: String::new(),
            url: String::new(),
            thumbnail_url: String::new(),
            duration: String::new(),
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

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = thumbnail_url.into();
        self
    }

    /// Add multiple tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Poster image, if one was provided
    pub fn poster(&self) -> Option<&str> {
        Some(self.thumbnail_url.as_str()).filter(|url| !url.is_empty())
    }

    /// Up to three tags shown on a library card
    pub fn card_tags(&self) -> &[String] {
        &self.tags[..self.tags.len().min(3)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_str() {
        assert_eq!("video".parse::<MediaType>().unwrap(), MediaType::Video);
        assert_eq!("Books".parse::<MediaType>().unwrap(), MediaType::Book);
        assert!("podcast".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_decode_backend_record() {
        let json = r#"{
            "id": "7f3a",
            "title": "Pillars of Faith",
            "description": "An introduction",
            "type": "video",
            "author": "Sh. Ahmad",
            "url": "https://cdn.example.org/pillars.mp4",
            "thumbnail_url": "",
            "duration": "12:30",
            "category": "Aqidah",
            "tags": ["belief", "basics"],
            "view_count": 42,
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-02T10:00:00Z"
        }"#;

        let item: LibraryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.as_str(), "7f3a");
        assert_eq!(item.media_type, MediaType::Video);
        assert_eq!(item.tags, vec!["belief", "basics"]);
        assert_eq!(item.view_count, 42);
        assert_eq!(item.poster(), None);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"id": "1", "type": "podcast", "title": "x"}"#;
        assert!(serde_json::from_str::<LibraryItem>(json).is_err());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id": "1", "type": "book"}"#;
        let item: LibraryItem = serde_json::from_str(json).unwrap();
        assert!(item.title.is_empty());
        assert!(item.tags.is_empty());
        assert_eq!(item.created_at, epoch());
    }

    #[test]
    fn test_card_tags_limited_to_three() {
        let item = LibraryItem::new("1", MediaType::Article, "t").with_tags(["a", "b", "c", "d"]);
        assert_eq!(item.card_tags(), &["a", "b", "c"]);
    }
}

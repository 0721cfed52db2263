//! Media asset model for object-storage backed uploads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{MediaAssetId, UserId};

/// Broad media category; constrains the accepted content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    File,
}

impl MediaType {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    /// Content types accepted for this media category.
    pub const fn allowed_content_types(self) -> &'static [&'static str] {
        match self {
            Self::Image => &["image/jpeg", "image/png", "image/gif", "image/webp"],
            Self::Video => &["video/mp4", "video/webm", "video/quicktime"],
            Self::File => &["application/pdf", "application/msword"],
        }
    }

    /// Whether `content_type` is acceptable for this category.
    pub fn accepts(self, content_type: &str) -> bool {
        self.allowed_content_types().contains(&content_type)
    }
}

/// An uploaded (or pending-upload) object in the media store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: MediaAssetId,
    pub owner_user_id: UserId,
    pub media_type: MediaType,
    pub bucket: String,
    pub storage_key: String,
    pub content_type: String,
    pub byte_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_gate() {
        assert!(MediaType::Image.accepts("image/png"));
        assert!(!MediaType::Image.accepts("video/mp4"));
        assert!(MediaType::Video.accepts("video/webm"));
        assert!(!MediaType::File.accepts("image/jpeg"));
    }
}

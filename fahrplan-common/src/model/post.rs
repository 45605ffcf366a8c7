use crate::model::Id;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// Image formats the backend accepts for upload.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Twitter => write!(f, "twitter"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct PlatformSet(Vec<Platform>);

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Error)]
#[error("A post must target at least one platform.")]
pub struct EmptyPlatformSetError;

impl PlatformSet {
    /// Deduplicates while preserving first-occurrence order.
    pub fn new(platforms: Vec<Platform>) -> Result<Self, EmptyPlatformSetError> {
        let mut deduplicated = Vec::with_capacity(platforms.len());
        for platform in platforms {
            if !deduplicated.contains(&platform) {
                deduplicated.push(platform);
            }
        }

        if deduplicated.is_empty() {
            Err(EmptyPlatformSetError)
        } else {
            Ok(Self(deduplicated))
        }
    }

    #[must_use]
    pub fn get(&self) -> &[Platform] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, platform: Platform) -> bool {
        self.0.contains(&platform)
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Platform> {
        self.0
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct ImagePath(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The image reference is invalid: {0:?}")]
pub struct InvalidImagePathError(String);

impl ImagePath {
    /// Requires a non-empty path with a recognized raster extension.
    pub fn new(path: String) -> Result<Self, InvalidImagePathError> {
        let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        let recognized =
            extension.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));

        if recognized {
            Ok(Self(path))
        } else {
            Err(InvalidImagePathError(path))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ImagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Pending,
    Published,
    Failed,
}

impl PostStatus {
    /// `Published` and `Failed` are terminal; a post never leaves them.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, PostStatus::Published | PostStatus::Failed)
    }
}

impl Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Pending => write!(f, "pending"),
            PostStatus::Published => write!(f, "published"),
            PostStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Error)]
#[error("The post text must not be empty.")]
pub struct EmptyTextContentError;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The scheduled time could not be parsed as an RFC 3339 instant: {0:?}")]
pub struct InvalidScheduledTimeError(String);

/// Parses an RFC 3339 instant and normalizes it to UTC.
pub fn parse_scheduled_time(raw: &str) -> Result<OffsetDateTime, InvalidScheduledTimeError> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(|instant| instant.to_offset(UtcOffset::UTC))
        .map_err(|_| InvalidScheduledTimeError(raw.to_owned()))
}

#[must_use]
pub fn format_scheduled_time(instant: OffsetDateTime) -> String {
    instant
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .expect("An in-range instant always formats as RFC 3339.")
}

/// A scheduled or completed social-media post.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub text_content: String,
    pub platforms: PlatformSet,
    pub scheduled_time: OffsetDateTime,
    pub image_path: ImagePath,
    pub status: PostStatus,
}

/// A validated submission; valid by construction through the field newtypes.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PostDraft {
    pub text_content: String,
    pub platforms: PlatformSet,
    pub scheduled_time: OffsetDateTime,
    pub image_path: ImagePath,
}

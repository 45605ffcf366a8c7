//! Wire shapes exchanged with the backend, and their conversions into the
//! validated model types. Conversion is where malformed remote data is
//! rejected; nothing duck-typed leaks past this module.

use fahrplan_common::model::{
    ModelValidationError,
    assist::{
        HashtagSuggestions, ImageCaption, InsightNarrative, PolishedText, PostCounts, Provenance,
        Tone, UnknownProvenanceError,
    },
    post::{
        ImagePath, Platform, PlatformSet, Post, PostDraft, PostStatus, format_scheduled_time,
        parse_scheduled_time,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error(transparent)]
    Model(#[from] ModelValidationError),
    #[error(transparent)]
    Provenance(#[from] UnknownProvenanceError),
    #[error("Payload field {0} was missing.")]
    MissingField(&'static str),
    #[error("Payload entry was malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Wire form of a scheduled post as the backend lists and returns it.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct PostPayload {
    pub id: u64,
    pub text_content: String,
    #[serde(default)]
    pub image_path: Option<String>,
    pub platforms: Vec<Platform>,
    pub scheduled_time: String,
    pub status: PostStatus,
}

impl TryFrom<PostPayload> for Post {
    type Error = PayloadError;

    fn try_from(value: PostPayload) -> Result<Self, Self::Error> {
        let image_path = value
            .image_path
            .ok_or(PayloadError::MissingField("image_path"))?;

        Ok(Self {
            id: value.id.into(),
            text_content: value.text_content,
            platforms: PlatformSet::new(value.platforms).map_err(ModelValidationError::from)?,
            scheduled_time: parse_scheduled_time(&value.scheduled_time)
                .map_err(ModelValidationError::from)?,
            image_path: ImagePath::new(image_path).map_err(ModelValidationError::from)?,
            status: value.status,
        })
    }
}

impl From<&Post> for PostPayload {
    fn from(value: &Post) -> Self {
        Self {
            id: value.id.get(),
            text_content: value.text_content.clone(),
            image_path: Some(value.image_path.get().to_owned()),
            platforms: value.platforms.get().to_vec(),
            scheduled_time: format_scheduled_time(value.scheduled_time),
            status: value.status,
        }
    }
}

/// A decoded snapshot: the posts that survived validation plus the number of
/// entries that did not.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub posts: Vec<Post>,
    pub rejected: usize,
}

impl Snapshot {
    /// Decodes every entry independently so one malformed post cannot poison
    /// the whole pull.
    #[must_use]
    pub fn decode(entries: Vec<Value>) -> Self {
        let mut posts = Vec::with_capacity(entries.len());
        let mut rejected = 0;

        for entry in entries {
            let decoded = serde_json::from_value::<PostPayload>(entry)
                .map_err(PayloadError::from)
                .and_then(Post::try_from);
            match decoded {
                Ok(post) => posts.push(post),
                Err(error) => {
                    warn!(%error, "Skipping malformed post entry in snapshot");
                    rejected += 1;
                }
            }
        }

        Self { posts, rejected }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct CreatePostBody {
    pub text_content: String,
    pub platforms: Vec<Platform>,
    pub scheduled_time: String,
    pub image_path: String,
}

impl From<&PostDraft> for CreatePostBody {
    fn from(value: &PostDraft) -> Self {
        Self {
            text_content: value.text_content.clone(),
            platforms: value.platforms.get().to_vec(),
            scheduled_time: format_scheduled_time(value.scheduled_time),
            image_path: value.image_path.get().to_owned(),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct HashtagRequestBody {
    pub text: String,
    pub api_key: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct PolishRequestBody {
    pub text: String,
    pub tone: Tone,
    pub api_key: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ImageRequestBody {
    pub image_path: String,
    pub api_key: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct InsightRequestBody {
    pub post_counts: PostCountsBody,
    pub api_key: String,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub struct PostCountsBody {
    pub published: u64,
    pub scheduled: u64,
    pub failed: u64,
}

impl From<PostCounts> for PostCountsBody {
    fn from(value: PostCounts) -> Self {
        Self {
            published: value.published,
            scheduled: value.scheduled,
            failed: value.failed,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct SuggestionsBody {
    pub suggestions: Vec<String>,
    pub source: String,
}

impl TryFrom<SuggestionsBody> for HashtagSuggestions {
    type Error = PayloadError;

    fn try_from(value: SuggestionsBody) -> Result<Self, Self::Error> {
        Ok(Self {
            tags: value.suggestions,
            provenance: value.source.parse::<Provenance>()?,
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct PolishBody {
    pub polished_text: String,
    pub source: String,
}

impl TryFrom<PolishBody> for PolishedText {
    type Error = PayloadError;

    fn try_from(value: PolishBody) -> Result<Self, Self::Error> {
        Ok(Self {
            text: value.polished_text,
            provenance: value.source.parse::<Provenance>()?,
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct CaptionBody {
    pub caption: String,
    pub source: String,
}

impl TryFrom<CaptionBody> for ImageCaption {
    type Error = PayloadError;

    fn try_from(value: CaptionBody) -> Result<Self, Self::Error> {
        Ok(Self {
            caption: value.caption,
            provenance: value.source.parse::<Provenance>()?,
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct InsightBody {
    pub insight: String,
    pub source: String,
}

impl TryFrom<InsightBody> for InsightNarrative {
    type Error = PayloadError;

    fn try_from(value: InsightBody) -> Result<Self, Self::Error> {
        Ok(Self {
            narrative: value.insight,
            provenance: value.source.parse::<Provenance>()?,
        })
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Deserialize)]
pub struct StatsBody {
    pub posts_published: u64,
    pub posts_scheduled: u64,
    pub posts_failed: u64,
}

impl From<StatsBody> for PostCounts {
    fn from(value: StatsBody) -> Self {
        Self {
            published: value.posts_published,
            scheduled: value.posts_scheduled,
            failed: value.posts_failed,
        }
    }
}

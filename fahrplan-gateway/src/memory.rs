//! An in-process stand-in for the remote backend. It keeps the engine fully
//! operable without a server: posts get sequential ids, due pending posts
//! are published (with a small simulated failure rate) whenever the
//! snapshot is pulled, and the AI endpoints answer with deterministic canned
//! output tagged as remote.

use crate::{
    client::{RemoteGateway, Result},
    payload::{PostPayload, Snapshot},
};
use async_trait::async_trait;
use fahrplan_common::model::{
    Id,
    assist::{
        ApiCredential, HashtagSuggestions, ImageCaption, InsightNarrative, PolishedText,
        PostCounts, Provenance, Tone,
    },
    post::{ImagePath, Post, PostDraft, PostStatus},
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;
use tracing::info;

/// Chance that publishing a due post fails, mirroring a flaky platform API.
pub const SIMULATED_FAILURE_RATE: f64 = 0.05;

#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    posts: Vec<Post>,
    issued_ids: u64,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flips due pending posts into a terminal status, the way the real
    /// backend's scheduler job does. Terminal statuses never revert.
    fn publish_due(state: &mut MemoryState, now: OffsetDateTime) {
        for post in &mut state.posts {
            if post.status == PostStatus::Pending && post.scheduled_time <= now {
                post.status = if rand::random::<f64>() < SIMULATED_FAILURE_RATE {
                    PostStatus::Failed
                } else {
                    PostStatus::Published
                };
                info!(id = %post.id, status = %post.status, "Published due post");
            }
        }
    }
}

#[async_trait]
impl RemoteGateway for MemoryGateway {
    async fn list_posts(&self) -> Result<Snapshot> {
        let mut state = self.lock();
        Self::publish_due(&mut state, OffsetDateTime::now_utc());

        Ok(Snapshot {
            posts: state.posts.clone(),
            rejected: 0,
        })
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<PostPayload> {
        let mut state = self.lock();
        state.issued_ids += 1;
        let post = Post {
            id: Id::new(state.issued_ids),
            text_content: draft.text_content.clone(),
            platforms: draft.platforms.clone(),
            scheduled_time: draft.scheduled_time,
            image_path: draft.image_path.clone(),
            status: PostStatus::Pending,
        };
        state.posts.push(post.clone());

        Ok(PostPayload::from(&post))
    }

    async fn suggest_hashtags(
        &self,
        text: &str,
        _credential: &ApiCredential,
    ) -> Result<HashtagSuggestions> {
        let lowered = text.to_ascii_lowercase();
        let mut tags = Vec::new();
        if lowered.contains("coffee") || lowered.contains("morning") {
            tags.extend(["#MorningCoffee", "#CoffeeTime", "#Brew"].map(str::to_owned));
        }
        if lowered.contains("coding") || lowered.contains("release") {
            tags.extend(["#CodingLife", "#BuildInPublic", "#DevLog"].map(str::to_owned));
        }

        Ok(HashtagSuggestions {
            tags,
            provenance: Provenance::Remote,
        })
    }

    async fn polish_content(
        &self,
        text: &str,
        tone: Tone,
        _credential: &ApiCredential,
    ) -> Result<PolishedText> {
        let text = match tone {
            Tone::Professional => {
                format!("Deployed the latest update. Fully operational. ({text})")
            }
            Tone::Humorous => format!(
                "Update dropped. Everything should work unless the cat interfered. ({text})"
            ),
            Tone::Concise => format!("Update deployed: system live. ({text})"),
        };

        Ok(PolishedText {
            text,
            provenance: Provenance::Remote,
        })
    }

    async fn analyze_image(
        &self,
        _image: &ImagePath,
        _credential: &ApiCredential,
    ) -> Result<ImageCaption> {
        Ok(ImageCaption {
            caption: "The image appears to be a promotional asset.".to_owned(),
            provenance: Provenance::Remote,
        })
    }

    async fn dynamic_insight(
        &self,
        counts: PostCounts,
        _credential: &ApiCredential,
    ) -> Result<InsightNarrative> {
        let narrative = if counts.failed > 0 {
            format!(
                "URGENT: {} posts failed to publish. Check the platform tokens immediately!",
                counts.failed
            )
        } else {
            format!(
                "{} published and {} scheduled. Keep the cadence going.",
                counts.published, counts.scheduled
            )
        };

        Ok(InsightNarrative {
            narrative,
            provenance: Provenance::Remote,
        })
    }

    async fn fetch_stats(&self) -> Result<PostCounts> {
        let state = self.lock();
        let mut counts = PostCounts::default();
        for post in &state.posts {
            match post.status {
                PostStatus::Published => counts.published += 1,
                PostStatus::Pending => counts.scheduled += 1,
                PostStatus::Failed => counts.failed += 1,
            }
        }

        Ok(counts)
    }
}

//! A counting mock of the gateway for engine tests.

use async_trait::async_trait;
use fahrplan_common::model::{
    Id,
    assist::{
        ApiCredential, HashtagSuggestions, ImageCaption, InsightNarrative, PolishedText,
        PostCounts, Provenance, Tone,
    },
    post::{ImagePath, Platform, PlatformSet, Post, PostDraft, PostStatus},
};
use fahrplan_gateway::{
    client::{GatewayError, RemoteGateway, Result},
    payload::{PayloadError, PostPayload, Snapshot},
};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};
use time::OffsetDateTime;

pub(crate) const CREATED_ID: u64 = 99;

pub(crate) struct MockGateway {
    snapshot: Option<Snapshot>,
    delay: Option<Duration>,
    fail_remote: bool,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    assist_calls: AtomicUsize,
}

impl MockGateway {
    pub(crate) fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            delay: None,
            fail_remote: false,
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            assist_calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails, as if the network were down.
    pub(crate) fn failing() -> Self {
        Self {
            snapshot: None,
            fail_remote: true,
            ..Self::with_snapshot(Snapshot::default())
        }
    }

    /// Makes `list_posts` take this long, to hold a pull in flight.
    pub(crate) fn delaying(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn assist_calls(&self) -> usize {
        self.assist_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn post(id: u64, scheduled_time: OffsetDateTime, status: PostStatus) -> Post {
        Post {
            id: Id::new(id),
            text_content: "Hello".to_owned(),
            platforms: PlatformSet::new(vec![Platform::Twitter]).unwrap(),
            scheduled_time,
            image_path: ImagePath::new("a.png".to_owned()).unwrap(),
            status,
        }
    }

    fn error() -> GatewayError {
        GatewayError::Payload(PayloadError::MissingField("response"))
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn list_posts(&self) -> Result<Snapshot> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.snapshot.clone().ok_or_else(Self::error)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<PostPayload> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remote {
            return Err(Self::error());
        }

        let post = Post {
            id: Id::new(CREATED_ID),
            text_content: draft.text_content.clone(),
            platforms: draft.platforms.clone(),
            scheduled_time: draft.scheduled_time,
            image_path: draft.image_path.clone(),
            status: PostStatus::Pending,
        };
        Ok(PostPayload::from(&post))
    }

    async fn suggest_hashtags(
        &self,
        _text: &str,
        _credential: &ApiCredential,
    ) -> Result<HashtagSuggestions> {
        self.assist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remote {
            return Err(Self::error());
        }

        Ok(HashtagSuggestions {
            tags: vec!["#remote".to_owned()],
            provenance: Provenance::Remote,
        })
    }

    async fn polish_content(
        &self,
        text: &str,
        _tone: Tone,
        _credential: &ApiCredential,
    ) -> Result<PolishedText> {
        self.assist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remote {
            return Err(Self::error());
        }

        Ok(PolishedText {
            text: format!("remote: {text}"),
            provenance: Provenance::Remote,
        })
    }

    async fn analyze_image(
        &self,
        _image: &ImagePath,
        _credential: &ApiCredential,
    ) -> Result<ImageCaption> {
        self.assist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remote {
            return Err(Self::error());
        }

        Ok(ImageCaption {
            caption: "remote caption".to_owned(),
            provenance: Provenance::Remote,
        })
    }

    async fn dynamic_insight(
        &self,
        _counts: PostCounts,
        _credential: &ApiCredential,
    ) -> Result<InsightNarrative> {
        self.assist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remote {
            return Err(Self::error());
        }

        Ok(InsightNarrative {
            narrative: "remote insight".to_owned(),
            provenance: Provenance::Remote,
        })
    }

    async fn fetch_stats(&self) -> Result<PostCounts> {
        if self.fail_remote {
            return Err(Self::error());
        }

        Ok(PostCounts {
            published: 3,
            scheduled: 2,
            failed: 1,
        })
    }
}

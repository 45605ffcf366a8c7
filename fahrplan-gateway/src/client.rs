use crate::payload::{PayloadError, PostPayload, Snapshot};
use async_trait::async_trait;
use fahrplan_common::model::{
    assist::{
        ApiCredential, HashtagSuggestions, ImageCaption, InsightNarrative, PolishedText,
        PostCounts, Tone,
    },
    post::{ImagePath, PostDraft},
};
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Error talking to the remote: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote replied with status {0}")]
    Status(StatusCode),
    #[error("Remote payload was invalid: {0}")]
    Payload(#[from] PayloadError),
}

/// The interface to the remote source of truth: post listing and creation,
/// the AI helper endpoints, and the analytics counts.
///
/// Implementations own their transport concerns (timeouts included); callers
/// can layer cancellation by dropping the returned futures.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Full snapshot of all scheduled posts. Malformed entries are skipped
    /// and counted, valid entries survive.
    async fn list_posts(&self) -> Result<Snapshot>;

    async fn create_post(&self, draft: &PostDraft) -> Result<PostPayload>;

    async fn suggest_hashtags(
        &self,
        text: &str,
        credential: &ApiCredential,
    ) -> Result<HashtagSuggestions>;

    async fn polish_content(
        &self,
        text: &str,
        tone: Tone,
        credential: &ApiCredential,
    ) -> Result<PolishedText>;

    async fn analyze_image(
        &self,
        image: &ImagePath,
        credential: &ApiCredential,
    ) -> Result<ImageCaption>;

    async fn dynamic_insight(
        &self,
        counts: PostCounts,
        credential: &ApiCredential,
    ) -> Result<InsightNarrative>;

    async fn fetch_stats(&self) -> Result<PostCounts>;
}

//! Remote-or-local routing for the AI-assisted helpers.
//!
//! The policy: no credential means the deterministic local substitute,
//! immediately and without touching the network. With a credential the
//! remote service is called, and a remote failure stays a failure; the
//! substitute never stands in for a service that was supposed to answer.

use crate::engine::{Engine, Result};
use fahrplan_common::model::{
    assist::{
        AiFeature, HashtagSuggestions, ImageCaption, InsightNarrative, PolishedText, PostCounts,
        Provenance, Tone,
    },
    post::ImagePath,
};
use fahrplan_gateway::client::RemoteGateway;
use tracing::debug;

/// Stats plus the narrative built from them, as the dashboard renders them.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct DashboardSummary {
    pub counts: PostCounts,
    pub insight: InsightNarrative,
}

// The substitutes are fixed templates, not attempts to imitate the remote
// service; they keep the UI usable offline and unauthenticated.

#[must_use]
pub fn local_hashtags() -> HashtagSuggestions {
    HashtagSuggestions {
        tags: ["#mocktag", "#sample", "#ai-fallback"]
            .map(str::to_owned)
            .to_vec(),
        provenance: Provenance::Local,
    }
}

#[must_use]
pub fn local_polish(text: &str) -> PolishedText {
    PolishedText {
        text: format!("Polished by mock AI: {text}"),
        provenance: Provenance::Local,
    }
}

#[must_use]
pub fn local_caption() -> ImageCaption {
    ImageCaption {
        caption: "This image is probably a picture of something interesting.".to_owned(),
        provenance: Provenance::Local,
    }
}

#[must_use]
pub fn local_insight(counts: PostCounts) -> InsightNarrative {
    let narrative = if counts.failed > 0 {
        format!(
            "URGENT: You have {} failed posts. Check your social tokens immediately!",
            counts.failed
        )
    } else {
        "Data is still accumulating. Schedule more posts for advanced insights.".to_owned()
    };

    InsightNarrative {
        narrative,
        provenance: Provenance::Local,
    }
}

impl<G: RemoteGateway + ?Sized> Engine<G> {
    pub async fn suggest_hashtags(&self, text: &str) -> Result<HashtagSuggestions> {
        let Some(credential) = &self.credential else {
            return Ok(local_hashtags());
        };

        debug!(feature = %AiFeature::SuggestHashtags, "Calling the remote assist");
        Ok(self.gateway.suggest_hashtags(text, credential).await?)
    }

    pub async fn polish_content(&self, text: &str, tone: Tone) -> Result<PolishedText> {
        let Some(credential) = &self.credential else {
            return Ok(local_polish(text));
        };

        debug!(feature = %AiFeature::PolishContent, %tone, "Calling the remote assist");
        Ok(self.gateway.polish_content(text, tone, credential).await?)
    }

    pub async fn analyze_image(&self, image: &ImagePath) -> Result<ImageCaption> {
        let Some(credential) = &self.credential else {
            return Ok(local_caption());
        };

        debug!(feature = %AiFeature::AnalyzeImage, "Calling the remote assist");
        Ok(self.gateway.analyze_image(image, credential).await?)
    }

    pub async fn dynamic_insight(&self, counts: PostCounts) -> Result<InsightNarrative> {
        let Some(credential) = &self.credential else {
            return Ok(local_insight(counts));
        };

        debug!(feature = %AiFeature::DynamicInsight, "Calling the remote assist");
        Ok(self.gateway.dynamic_insight(counts, credential).await?)
    }

    /// Fetches the aggregate counts and builds the insight from them, the
    /// two-step flow behind the dashboard page.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let counts = self.gateway.fetch_stats().await?;
        let insight = self.dynamic_insight(counts).await?;

        Ok(DashboardSummary { counts, insight })
    }
}

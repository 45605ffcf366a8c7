use crate::{
    client::{GatewayError, RemoteGateway, Result},
    payload::{
        CaptionBody, CreatePostBody, HashtagRequestBody, ImageRequestBody, InsightBody,
        InsightRequestBody, PolishBody, PolishRequestBody, PostPayload, Snapshot, StatsBody,
        SuggestionsBody,
    },
};
use async_trait::async_trait;
use fahrplan_common::model::{
    assist::{
        ApiCredential, HashtagSuggestions, ImageCaption, InsightNarrative, PolishedText,
        PostCounts, Tone,
    },
    post::{ImagePath, PostDraft},
};
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`RemoteGateway`] over HTTP, speaking the scheduling backend's JSON API.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    base_url: String,
    http: Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn list_posts(&self) -> Result<Snapshot> {
        let entries: Vec<Value> = self.get_json("/posts/").await?;
        Ok(Snapshot::decode(entries))
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<PostPayload> {
        self.post_json("/posts/", &CreatePostBody::from(draft)).await
    }

    async fn suggest_hashtags(
        &self,
        text: &str,
        credential: &ApiCredential,
    ) -> Result<HashtagSuggestions> {
        let body = HashtagRequestBody {
            text: text.to_owned(),
            api_key: credential.get().to_owned(),
        };
        let response: SuggestionsBody =
            self.post_json("/analytics/ai/suggest_hashtags", &body).await?;

        Ok(HashtagSuggestions::try_from(response)?)
    }

    async fn polish_content(
        &self,
        text: &str,
        tone: Tone,
        credential: &ApiCredential,
    ) -> Result<PolishedText> {
        let body = PolishRequestBody {
            text: text.to_owned(),
            tone,
            api_key: credential.get().to_owned(),
        };
        let response: PolishBody = self.post_json("/analytics/ai/polish_content", &body).await?;

        Ok(PolishedText::try_from(response)?)
    }

    async fn analyze_image(
        &self,
        image: &ImagePath,
        credential: &ApiCredential,
    ) -> Result<ImageCaption> {
        let body = ImageRequestBody {
            image_path: image.get().to_owned(),
            api_key: credential.get().to_owned(),
        };
        let response: CaptionBody = self.post_json("/analytics/ai/analyze_image", &body).await?;

        Ok(ImageCaption::try_from(response)?)
    }

    async fn dynamic_insight(
        &self,
        counts: PostCounts,
        credential: &ApiCredential,
    ) -> Result<InsightNarrative> {
        let body = InsightRequestBody {
            post_counts: counts.into(),
            api_key: credential.get().to_owned(),
        };
        let response: InsightBody = self.post_json("/analytics/ai/dynamic_insight", &body).await?;

        Ok(InsightNarrative::try_from(response)?)
    }

    async fn fetch_stats(&self) -> Result<PostCounts> {
        let stats: StatsBody = self.get_json("/analytics/stats").await?;
        Ok(stats.into())
    }
}

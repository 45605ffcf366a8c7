use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Rewriting tone offered by the content-polishing helper.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Concise,
    Professional,
    Humorous,
}

impl Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Concise => write!(f, "concise"),
            Tone::Professional => write!(f, "professional"),
            Tone::Humorous => write!(f, "humorous"),
        }
    }
}

/// Whether an assist result came from the remote service or from the local
/// deterministic substitute. Every assist response carries one so the UI can
/// disclose the source.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Provenance {
    Remote,
    Local,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Unrecognized provenance tag: {0:?}")]
pub struct UnknownProvenanceError(String);

impl FromStr for Provenance {
    type Err = UnknownProvenanceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "remote" | "gemini" => Ok(Provenance::Remote),
            "local" | "mock" => Ok(Provenance::Local),
            _ => Err(UnknownProvenanceError(raw.to_owned())),
        }
    }
}

impl Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Remote => write!(f, "remote"),
            Provenance::Local => write!(f, "local"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum AiFeature {
    SuggestHashtags,
    PolishContent,
    AnalyzeImage,
    DynamicInsight,
}

impl Display for AiFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiFeature::SuggestHashtags => write!(f, "suggest_hashtags"),
            AiFeature::PolishContent => write!(f, "polish_content"),
            AiFeature::AnalyzeImage => write!(f, "analyze_image"),
            AiFeature::DynamicInsight => write!(f, "dynamic_insight"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct HashtagSuggestions {
    pub tags: Vec<String>,
    pub provenance: Provenance,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PolishedText {
    pub text: String,
    pub provenance: Provenance,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ImageCaption {
    pub caption: String,
    pub provenance: Provenance,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct InsightNarrative {
    pub narrative: String,
    pub provenance: Provenance,
}

/// Aggregate post counts behind the dashboard chart and the dynamic insight.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct PostCounts {
    pub published: u64,
    pub scheduled: u64,
    pub failed: u64,
}

/// Opaque credential for the remote AI helper. An absent and an empty
/// credential are deliberately the same thing: no credential.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct ApiCredential(String);

impl ApiCredential {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() { None } else { Some(Self(raw)) }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

/// The credential is a secret; keep it out of logs.
impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiCredential(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_parsing_is_lenient_on_known_tags() {
        assert_eq!("remote".parse(), Ok(Provenance::Remote));
        assert_eq!("Gemini".parse(), Ok(Provenance::Remote));
        assert_eq!("local".parse(), Ok(Provenance::Local));
        assert_eq!("Mock".parse(), Ok(Provenance::Local));

        assert!("oracle".parse::<Provenance>().is_err());
    }

    #[test]
    fn empty_credentials_are_no_credentials() {
        assert!(ApiCredential::new("").is_none());
        assert!(ApiCredential::new("   ").is_none());
        assert!(ApiCredential::new("key-123").is_some());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = ApiCredential::new("very-secret").unwrap();
        assert_eq!(format!("{credential:?}"), "ApiCredential(..)");
    }
}

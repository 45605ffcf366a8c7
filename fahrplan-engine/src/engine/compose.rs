use fahrplan_common::model::{
    ModelValidationError,
    assist::{PolishedText, Tone},
    post::{
        EmptyTextContentError, ImagePath, Platform, PlatformSet, PostDraft, parse_scheduled_time,
    },
};

/// The compose form's client state: raw field values plus the ephemeral
/// hashtag suggestion set. Validation happens in [`ComposeState::to_draft`],
/// strictly before any I/O.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ComposeState {
    pub text: String,
    pub tone: Tone,
    platforms: Vec<Platform>,
    /// RFC 3339 instant as entered/derived by the form.
    pub scheduled_time: String,
    pub image_path: String,
    suggestions: Vec<String>,
}

impl ComposeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_platform(&mut self, platform: Platform) {
        if let Some(position) = self.platforms.iter().position(|p| *p == platform) {
            self.platforms.remove(position);
        } else {
            self.platforms.push(platform);
        }
    }

    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Moves an offered tag into the text and out of the suggestion set.
    pub fn accept_suggestion(&mut self, tag: &str) {
        let Some(position) = self.suggestions.iter().position(|t| t == tag) else {
            return;
        };
        let tag = self.suggestions.remove(position);
        self.text.push(' ');
        self.text.push_str(&tag);
    }

    pub fn apply_polish(&mut self, polished: PolishedText) {
        self.text = polished.text;
    }

    /// The validation seam: everything the form gathered, checked and turned
    /// into a typed draft.
    pub fn to_draft(&self) -> Result<PostDraft, ModelValidationError> {
        let text_content = self.text.trim();
        if text_content.is_empty() {
            return Err(EmptyTextContentError.into());
        }

        Ok(PostDraft {
            text_content: text_content.to_owned(),
            platforms: PlatformSet::new(self.platforms.clone())?,
            scheduled_time: parse_scheduled_time(&self.scheduled_time)?,
            image_path: ImagePath::new(self.image_path.clone())?,
        })
    }

    /// Clears the form after a successful submission, keeping only the tone
    /// preference.
    pub fn reset(&mut self) {
        *self = Self {
            tone: self.tone,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn filled() -> ComposeState {
        let mut compose = ComposeState::new();
        compose.text = "Fresh coffee".to_owned();
        compose.toggle_platform(Platform::Twitter);
        compose.scheduled_time = "2025-03-01T10:00:00Z".to_owned();
        compose.image_path = "a.png".to_owned();
        compose
    }

    #[test]
    fn a_filled_form_parses_into_a_draft() {
        let draft = filled().to_draft().unwrap();

        assert_eq!(draft.text_content, "Fresh coffee");
        assert_eq!(draft.platforms.get(), [Platform::Twitter]);
        assert_eq!(draft.scheduled_time, datetime!(2025-03-01 10:00 UTC));
    }

    #[test]
    fn missing_fields_are_validation_errors() {
        let mut no_text = filled();
        no_text.text = "   ".to_owned();
        assert!(no_text.to_draft().is_err());

        let mut no_platforms = filled();
        no_platforms.toggle_platform(Platform::Twitter);
        assert!(no_platforms.to_draft().is_err());

        let mut bad_time = filled();
        bad_time.scheduled_time = "2025-03-01T10:00".to_owned();
        assert!(bad_time.to_draft().is_err());

        let mut no_image = filled();
        no_image.image_path = String::new();
        assert!(no_image.to_draft().is_err());
    }

    #[test]
    fn toggling_twice_removes_the_platform() {
        let mut compose = ComposeState::new();
        compose.toggle_platform(Platform::Instagram);
        compose.toggle_platform(Platform::Twitter);
        compose.toggle_platform(Platform::Instagram);

        assert_eq!(compose.platforms(), [Platform::Twitter]);
    }

    #[test]
    fn accepting_a_suggestion_moves_it_into_the_text() {
        let mut compose = filled();
        compose.set_suggestions(vec!["#brew".to_owned(), "#morning".to_owned()]);

        compose.accept_suggestion("#brew");

        assert_eq!(compose.text, "Fresh coffee #brew");
        assert_eq!(compose.suggestions(), ["#morning".to_owned()]);

        // Accepting something not on offer changes nothing.
        compose.accept_suggestion("#brew");
        assert_eq!(compose.text, "Fresh coffee #brew");
    }

    #[test]
    fn reset_clears_everything_but_the_tone() {
        let mut compose = filled();
        compose.tone = Tone::Humorous;
        compose.set_suggestions(vec!["#brew".to_owned()]);

        compose.reset();

        assert_eq!(compose.tone, Tone::Humorous);
        assert!(compose.text.is_empty());
        assert!(compose.platforms().is_empty());
        assert!(compose.suggestions().is_empty());
        assert!(compose.scheduled_time.is_empty());
    }
}

//! ComposedPrompt - A rendered prompt ready for the hosted model

use crate::domain::value_objects::MediaReference;

/// One part of a composed prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// Embedded media directive; the reference is forwarded untouched
    Media(MediaReference),
}

/// Ordered text and media parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedPrompt {
    parts: Vec<PromptPart>,
}

impl ComposedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text, merging with a preceding text part
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(PromptPart::Text(last)) = self.parts.last_mut() {
            last.push_str(text);
        } else {
            self.parts.push(PromptPart::Text(text.to_string()));
        }
    }

    pub fn push_media(&mut self, media: MediaReference) {
        self.parts.push(PromptPart::Media(media));
    }

    pub fn parts(&self) -> &[PromptPart] {
        &self.parts
    }

    /// Concatenated text parts, media omitted
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PromptPart::Text(text) => Some(text.as_str()),
                PromptPart::Media(_) => None,
            })
            .collect()
    }

    pub fn media(&self) -> impl Iterator<Item = &MediaReference> {
        self.parts.iter().filter_map(|part| match part {
            PromptPart::Media(media) => Some(media),
            PromptPart::Text(_) => None,
        })
    }
}

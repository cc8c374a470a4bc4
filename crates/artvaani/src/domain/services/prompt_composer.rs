//! Prompt Composer
//!
//! Renders a template against a validated request. Deterministic: the same
//! template and request always yield the same prompt.

use crate::domain::entities::{ComposedPrompt, FlowRequest, PromptTemplate, Segment};
use crate::domain::errors::FlowError;
use crate::domain::value_objects::FieldValue;

pub fn compose_prompt(
    template: &PromptTemplate,
    request: &FlowRequest,
) -> Result<ComposedPrompt, FlowError> {
    let mut prompt = ComposedPrompt::new();

    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => prompt.push_text(text),
            Segment::Field(name) | Segment::Media(name) => {
                let value = request.get(name).ok_or_else(|| {
                    FlowError::Template(format!(
                        "placeholder '{}' in template '{}' has no corresponding field",
                        name,
                        template.name()
                    ))
                })?;

                match (segment, value) {
                    (_, FieldValue::Media(media)) => prompt.push_media(media.clone()),
                    (Segment::Media(_), _) => {
                        return Err(FlowError::Template(format!(
                            "media placeholder '{}' in template '{}' refers to a non-media field",
                            name,
                            template.name()
                        )));
                    }
                    (_, other) => prompt.push_text(&other.to_string()),
                }
            }
        }
    }

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PromptPart;
    use crate::domain::value_objects::MediaReference;

    fn photo() -> MediaReference {
        MediaReference::parse("data:image/jpeg;base64,/9j/4AAQ").unwrap()
    }

    #[test]
    fn test_substitutes_text_and_embeds_media() {
        let template = PromptTemplate::new(
            "listing",
            "Photo: {{media photo}}\nCraft: {{craft}} ({{year}})",
        );
        let request = FlowRequest::new()
            .with("photo", photo())
            .with("craft", "Dhokra")
            .with("year", 1850.0);

        let prompt = compose_prompt(&template, &request).unwrap();
        assert_eq!(
            prompt.parts(),
            &[
                PromptPart::Text("Photo: ".to_string()),
                PromptPart::Media(photo()),
                PromptPart::Text("\nCraft: Dhokra (1850)".to_string()),
            ]
        );
    }

    #[test]
    fn test_composition_is_deterministic() {
        let template = PromptTemplate::new("insights", "Answer in {{language}}.\n\nCraft: {{craftName}}");
        let request = FlowRequest::new()
            .with("craftName", "Madhubani painting")
            .with("language", "hi-IN");

        let first = compose_prompt(&template, &request).unwrap();
        let second = compose_prompt(&template, &request).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.text().as_bytes(), second.text().as_bytes());
    }

    #[test]
    fn test_missing_placeholder_field_fails() {
        let template = PromptTemplate::new("insights", "Craft: {{craftName}}");
        let err = compose_prompt(&template, &FlowRequest::new()).unwrap_err();
        assert!(matches!(err, FlowError::Template(msg) if msg.contains("craftName")));
    }

    #[test]
    fn test_media_directive_on_text_field_fails() {
        let template = PromptTemplate::new("bad", "{{media craft}}");
        let request = FlowRequest::new().with("craft", "Pattachitra");
        assert!(matches!(
            compose_prompt(&template, &request),
            Err(FlowError::Template(_))
        ));
    }
}

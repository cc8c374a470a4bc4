//! PromptTemplate - Immutable prompt with named placeholders
//!
//! `{{name}}` substitutes a field's text, `{{media name}}` embeds a media
//! reference as a separate prompt part. An unclosed `{{` is kept literally.

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const MEDIA_DIRECTIVE: &str = "media ";

/// Parsed piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(String),
    Media(String),
}

/// A named template, parsed once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: &'static str,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(name: &'static str, source: &str) -> Self {
        Self {
            name,
            segments: parse(source),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Field names referenced by the template, in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Field(name) | Segment::Media(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

fn parse(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        literal.push_str(&rest[..start]);
        let inner = after_open[..end].trim();

        let segment = match inner.strip_prefix(MEDIA_DIRECTIVE) {
            Some(name) => Segment::Media(name.trim().to_string()),
            None => Segment::Field(inner.to_string()),
        };

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(segment);
        rest = &after_open[end + CLOSE.len()..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

//! Turning instruction markup into numbered steps
//!
//! The API sends instructions as a single HTML blob, usually an ordered list
//! or paragraphs where each step starts with `"<n>. "`. Tags are removed and
//! the text is split at those step markers.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

static STEP_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\.\s+").expect("Invalid step marker regex"));

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").expect("Invalid digit regex"));

/// Same digits as `\d` in [`STEP_MARKER`], so `½` or `²` are not digits
fn is_digit(c: char) -> bool {
    DIGIT.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Removes everything between angle brackets
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    HTML_TAG.replace_all(html, "")
}

/// A numbered step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedStep {
    /// Number as written in the text
    pub number: String,
    pub text: String,
}

impl ParsedStep {
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
        }
    }
}

/// Result of parsing instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Instructions {
    /// Numbered steps, in order
    Steps(Vec<ParsedStep>),
    /// Text without step markers, tags removed
    Text(String),
    /// No instructions at all
    Missing,
}

impl Instructions {
    /// Parses instruction markup
    ///
    /// Any text before the first step marker is dropped, and so are steps
    /// with no text. When that leaves nothing, the whole text is returned
    /// as [`Instructions::Text`].
    ///
    /// Markup that is only whitespace once the tags are removed, like
    /// `"<p> </p>"`, is [`Instructions::Missing`] rather than an empty text.
    #[tracing::instrument(
        level = "debug",
        name = "instructions",
        skip_all,
        fields(len = html.map_or(0, str::len))
    )]
    pub fn parse(html: Option<&str>) -> Self {
        let Some(html) = html else {
            return Self::Missing;
        };
        let plain = strip_tags(html);
        if plain.trim().is_empty() {
            return Self::Missing;
        }

        let steps = split_steps(&plain);
        if steps.is_empty() {
            Self::Text(plain.trim().to_string())
        } else {
            Self::Steps(steps)
        }
    }

    pub fn steps(&self) -> &[ParsedStep] {
        match self {
            Self::Steps(steps) => steps,
            _ => &[],
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

fn split_steps(text: &str) -> Vec<ParsedStep> {
    // markers inside a longer number, like the "2. " in "12. ", are part of
    // the text of the previous step
    let markers: Vec<(&str, usize, usize)> = STEP_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?;
            let after_digit = text[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(is_digit);
            (!after_digit).then_some((number.as_str(), whole.start(), whole.end()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(i, &(number, _, text_start))| {
            let text_end = markers.get(i + 1).map_or(text.len(), |m| m.1);
            let step = text[text_start..text_end].trim();
            (!step.is_empty()).then(|| ParsedStep::new(number.trim(), step))
        })
        .collect()
}

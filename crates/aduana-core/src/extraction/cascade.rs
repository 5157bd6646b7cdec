//! Ordered fallback patterns for a single field.

use regex::{Captures, Regex};
use tracing::{debug, trace};

use super::rules::patterns::expand_placeholders;

/// A value matched by one pattern of a cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Post-processed value.
    pub value: T,
    /// Index of the pattern that produced the value.
    pub pattern_index: usize,
    /// Position of the whole match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, pattern_index: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            pattern_index,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Patterns for one field, most specific first.
///
/// The first pattern whose capture survives post-processing wins. A capture
/// that post-processing rejects (an impossible date, say) falls through to
/// the next pattern. Patterns may use the placeholders from
/// [`PLACEHOLDERS`](super::rules::patterns::PLACEHOLDERS).
#[derive(Debug, Clone)]
pub struct Cascade {
    field: &'static str,
    patterns: Vec<Regex>,
}

impl Cascade {
    pub fn new<S: AsRef<str>>(field: &'static str, patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&expand_placeholders(p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { field, patterns })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First non-empty capture, trimmed.
    pub fn find(&self, text: &str) -> Option<ExtractionMatch<String>> {
        self.find_map(text, |v| Some(v.to_string()))
    }

    /// First capture accepted by `post`.
    pub fn find_map<T, F>(&self, text: &str, post: F) -> Option<ExtractionMatch<T>>
    where
        F: Fn(&str) -> Option<T>,
    {
        for (index, pattern) in self.patterns.iter().enumerate() {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let Some(raw) = capture_value(&caps) else {
                continue;
            };

            match post(raw) {
                Some(value) => {
                    debug!(field = self.field, pattern = index, value = raw, "matched");
                    let whole = &caps[0];
                    let start = caps.get(0).map_or(0, |m| m.start());
                    return Some(
                        ExtractionMatch::new(value, index, whole)
                            .with_position(start, start + whole.len()),
                    );
                }
                None => trace!(field = self.field, pattern = index, raw, "capture rejected"),
            }
        }

        trace!(field = self.field, "no pattern matched");
        None
    }

    /// Post-processed value of the first accepted capture.
    pub fn value<T, F>(&self, text: &str, post: F) -> Option<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        self.find_map(text, post).map(|m| m.value)
    }

    /// Like [`value`](Self::value) but empty when nothing matched.
    pub fn text<F>(&self, text: &str, post: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        self.value(text, post).unwrap_or_default()
    }
}

/// First participating, non-empty group; the whole match for group-less
/// patterns.
fn capture_value<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    let value = if caps.len() > 1 {
        caps.iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().trim())
            .find(|s| !s.is_empty())?
    } else {
        caps.get(0)?.as_str().trim()
    };
    (!value.is_empty()).then_some(value)
}

//! Core data types shared across crates.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ManasikError, Result};

/// A single knowledge corpus entry.
///
/// Only `content` carries ground truth; the rest is display and search
/// metadata. Absent or `null` fields deserialize to empty values instead of
/// rejecting the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Title for display, or `None` when absent or empty.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Category for display, or `None` when absent or empty.
    pub fn display_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Text used for lexical matching: content followed by title, category and tags.
    pub fn search_text(&self) -> String {
        let tags = self.tags.join(" ");
        let extra = [
            self.title.as_deref().unwrap_or(""),
            self.category.as_deref().unwrap_or(""),
            tags.as_str(),
        ]
        .join(" ");
        format!("{} {}", self.content, extra)
    }
}

/// A corpus document paired with its relevance score for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredResult<'a> {
    pub doc: &'a Document,
    /// Fraction of query tokens found in the document, in `[0.0, 1.0]`.
    pub score: f64,
}

/// Token accounting reported by the generative service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Normalised response from a generative provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Primary text output, if the service produced any.
    pub content: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl ProviderResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// The primary text output, or `MissingOutput` when the response has none.
    pub fn primary_text(&self) -> Result<&str> {
        self.content.as_deref().ok_or_else(|| {
            ManasikError::MissingOutput(format!(
                "no text content (finish_reason: {})",
                self.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })
    }
}

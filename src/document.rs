/*!
 * Document model for front-matter based content files.
 *
 * A content document is a YAML key-value header delimited by `---` lines,
 * followed by a blank line and a free-form markdown body. Parsing is
 * fail-open: anything that is not a well-formed header is treated as a
 * body-only document, because the scanner must keep working on posts with
 * damaged metadata.
 */

use serde_yaml::{Mapping, Value};

/// Marker line delimiting the front-matter block
pub const HEADER_DELIMITER: &str = "---";

/// Structured front-matter header of a document
pub type FrontMatter = Mapping;

/// A parsed content document: optional front matter plus body text
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Parsed key-value header, `None` when missing or unparseable
    pub front_matter: Option<FrontMatter>,
    /// Body text after the header block
    pub body: String,
}

impl Document {
    /// Create a document from already-built parts
    pub fn new(front_matter: Option<FrontMatter>, body: impl Into<String>) -> Self {
        Self {
            front_matter,
            body: body.into(),
        }
    }

    /// Parse raw file content into a document.
    ///
    /// The header must start at the first byte with a `---` line and be
    /// closed by another `---` line. On any deviation the whole content
    /// becomes the body and `front_matter` is `None`.
    pub fn parse(content: &str) -> Self {
        let Some(rest) = content.strip_prefix("---\n").or_else(|| content.strip_prefix("---\r\n"))
        else {
            return Self::new(None, content);
        };

        let Some(end) = rest.find("\n---") else {
            return Self::new(None, content);
        };

        let header_text = &rest[..end + 1];
        let body = rest[end + 4..].trim_start().to_string();

        match serde_yaml::from_str::<Value>(header_text) {
            Ok(Value::Mapping(mapping)) => Self::new(Some(mapping), body),
            _ => Self::new(None, content),
        }
    }

    /// Serialize the document back to file content.
    ///
    /// Key order in the header is preserved as parsed. The body is separated
    /// from the header by a blank line, matching the source convention.
    pub fn serialize(&self) -> String {
        match &self.front_matter {
            Some(mapping) => {
                let header = serde_yaml::to_string(mapping).unwrap_or_default();
                format!("{}\n{}{}\n\n{}", HEADER_DELIMITER, header, HEADER_DELIMITER, self.body)
            }
            None => self.body.clone(),
        }
    }

    /// Whether a parseable header is present
    pub fn has_front_matter(&self) -> bool {
        self.front_matter.is_some()
    }

    /// Look up a string-valued header field
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.front_matter
            .as_ref()
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
    }

    /// Replace a string-valued header field, creating it if absent
    pub fn set_str_field(&mut self, key: &str, value: impl Into<String>) {
        if let Some(mapping) = self.front_matter.as_mut() {
            mapping.insert(Value::String(key.to_string()), Value::String(value.into()));
        }
    }

    /// The tag list from the header; empty when absent or not a list
    pub fn tags(&self) -> Vec<&str> {
        self.front_matter
            .as_ref()
            .and_then(|m| m.get("tags"))
            .and_then(Value::as_sequence)
            .map(|seq| seq.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The publish date string from the header, if any
    pub fn date(&self) -> Option<&str> {
        self.str_field("date")
    }

    /// The canonical URL path from the header, if any
    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }
}

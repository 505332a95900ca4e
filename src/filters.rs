/*!
 * Composable exclusion filters for the coverage scanner.
 *
 * Each filter is a named predicate over a post's front matter. Filters run
 * in configured order and the chain stops at the first match, so the first
 * matching filter determines the reported skip reason. All filters are
 * fail-open: a post with no parseable front matter, or a date that does not
 * parse, is never skipped.
 */

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::document::FrontMatter;

/// Fixed publish-date format: weekday, day, month, year, time, offset
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

fn default_true() -> bool {
    true
}

fn default_archive_tag() -> String {
    "zArchive".to_string()
}

/// The kind of check a filter performs, with its typed configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum FilterKind {
    /// Skip posts carrying the archive tag
    Archived {
        #[serde(default = "default_archive_tag")]
        tag: String,
    },
    /// Skip posts published outside the configured year range
    DateRange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_year: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_year: Option<i32>,
    },
    /// Skip posts carrying an arbitrary tag
    Tag { tag: String },
}

impl FilterKind {
    /// Stable name used in reports and skip counters
    pub fn name(&self) -> &'static str {
        match self {
            Self::Archived { .. } => "archived",
            Self::DateRange { .. } => "date_range",
            Self::Tag { .. } => "tag",
        }
    }

    /// Filter configuration as a JSON object for the report's
    /// `filters_applied` section
    pub fn config_value(&self) -> serde_json::Value {
        match self {
            Self::Archived { tag } | Self::Tag { tag } => json!({ "tag": tag }),
            Self::DateRange { min_year, max_year } => {
                let mut config = serde_json::Map::new();
                if let Some(min) = min_year {
                    config.insert("min_year".to_string(), json!(min));
                }
                if let Some(max) = max_year {
                    config.insert("max_year".to_string(), json!(max));
                }
                serde_json::Value::Object(config)
            }
        }
    }
}

/// A configured exclusion filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostFilter {
    /// Disabled filters never trigger
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(flatten)]
    pub kind: FilterKind,
}

impl PostFilter {
    pub fn new(kind: FilterKind) -> Self {
        Self { enabled: true, kind }
    }

    /// Whether this filter excludes the given post
    pub fn should_skip(&self, front_matter: Option<&FrontMatter>) -> bool {
        if !self.enabled {
            return false;
        }

        let Some(front_matter) = front_matter else {
            return false;
        };

        match &self.kind {
            FilterKind::Archived { tag } | FilterKind::Tag { tag } => {
                Self::has_tag(front_matter, tag)
            }
            FilterKind::DateRange { min_year, max_year } => {
                Self::outside_year_range(front_matter, *min_year, *max_year)
            }
        }
    }

    fn has_tag(front_matter: &FrontMatter, tag: &str) -> bool {
        front_matter
            .get("tags")
            .and_then(serde_yaml::Value::as_sequence)
            .is_some_and(|tags| tags.iter().filter_map(serde_yaml::Value::as_str).any(|t| t == tag))
    }

    fn outside_year_range(
        front_matter: &FrontMatter,
        min_year: Option<i32>,
        max_year: Option<i32>,
    ) -> bool {
        let Some(date_str) = front_matter.get("date").and_then(serde_yaml::Value::as_str) else {
            return false;
        };

        // Unparseable dates fall through to the scanner (fail-open)
        let Ok(date) = DateTime::parse_from_str(date_str, DATE_FORMAT) else {
            return false;
        };

        let year = date.year();

        if min_year.is_some_and(|min| year < min) {
            return true;
        }
        if max_year.is_some_and(|max| year > max) {
            return true;
        }

        false
    }
}

/// Ordered set of exclusion filters with short-circuit evaluation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FilterChain {
    filters: Vec<PostFilter>,
}

impl FilterChain {
    pub fn new(filters: Vec<PostFilter>) -> Self {
        Self { filters }
    }

    /// Evaluate the chain against a post's front matter.
    ///
    /// Returns the name of the first matching enabled filter, or `None`
    /// when the post passes every filter.
    pub fn evaluate(&self, front_matter: Option<&FrontMatter>) -> Option<&'static str> {
        self.filters
            .iter()
            .find(|f| f.should_skip(front_matter))
            .map(|f| f.kind.name())
    }

    /// The enabled filters, in order, for report output
    pub fn enabled_filters(&self) -> impl Iterator<Item = &PostFilter> {
        self.filters.iter().filter(|f| f.enabled)
    }
}

impl Default for FilterChain {
    /// The default chain: exclude archived posts and posts published
    /// before 2025.
    fn default() -> Self {
        Self::new(vec![
            PostFilter::new(FilterKind::Archived {
                tag: default_archive_tag(),
            }),
            PostFilter::new(FilterKind::DateRange {
                min_year: Some(2025),
                max_year: None,
            }),
        ])
    }
}

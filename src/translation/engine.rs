/*!
 * Document translation engine.
 *
 * Splits a document into header-field translations (a fixed allow-list of
 * textual fields, plus nested cover caption/alt text) and a single body
 * translation. URL-bearing fields are never sent to the provider; they are
 * rewritten deterministically with a language path prefix.
 *
 * A failed header-field translation is non-fatal: the field stays in the
 * source language and processing continues. A failed body translation
 * fails the whole attempt.
 */

use log::{debug, warn};
use serde_yaml::Value;
use std::sync::Arc;

use crate::app_config::DEFAULT_LANGUAGE;
use crate::document::Document;
use crate::errors::TranslationError;
use crate::providers::Provider;

/// Header fields sent to translation, in processing order
pub const TRANSLATABLE_FIELDS: [&str; 4] = ["title", "seoTitle", "description", "summary"];

/// Nested cover fields sent to translation
const COVER_FIELDS: [&str; 2] = ["alt", "caption"];

/// Translates documents field by field through an injected provider
pub struct TranslationEngine {
    provider: Arc<dyn Provider>,
}

impl TranslationEngine {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Translate a document into the target language.
    ///
    /// Returns the translated document, or an error when the source has no
    /// front matter or the body translation fails.
    pub async fn translate_document(
        &self,
        source: &Document,
        target_language: &str,
    ) -> Result<Document, TranslationError> {
        let Some(front_matter) = source.front_matter.clone() else {
            return Err(TranslationError::MissingFrontMatter);
        };

        let mut translated = Document::new(Some(front_matter), source.body.clone());

        for field in TRANSLATABLE_FIELDS {
            if let Some(value) = translated.str_field(field).map(String::from) {
                if value.is_empty() {
                    continue;
                }
                let context =
                    format!("This is a {} field for a technical blog post.", field);
                match self.provider.translate(&value, target_language, &context).await {
                    Ok(text) => translated.set_str_field(field, text),
                    Err(e) => {
                        warn!("Field '{}' left untranslated: {}", field, e);
                    }
                }
            }
        }

        self.translate_cover(&mut translated, target_language).await;

        if let Some(url) = translated.url().map(String::from) {
            translated.set_str_field("url", rewrite_url(&url, target_language));
        }

        let body_context = "This is the main content of a technical blog post. \
                            Preserve all markdown formatting, code blocks, and links.";
        let body = self
            .provider
            .translate(&source.body, target_language, body_context)
            .await?;

        debug!("Translated document body ({} chars)", body.chars().count());
        translated.body = body;
        Ok(translated)
    }

    /// Translate the nested cover alt/caption fields, when present.
    /// Failures leave the field untranslated, like any other header field.
    async fn translate_cover(&self, document: &mut Document, target_language: &str) {
        let Some(mapping) = document.front_matter.as_mut() else {
            return;
        };
        let Some(Value::Mapping(cover)) = mapping.get_mut("cover") else {
            return;
        };

        for field in COVER_FIELDS {
            let Some(value) = cover.get(field).and_then(Value::as_str).map(String::from) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            let context = match field {
                "alt" => "This is an alt text for an image in a technical blog post.",
                _ => "This is a caption for an image in a technical blog post.",
            };

            match self.provider.translate(&value, target_language, context).await {
                Ok(text) => {
                    cover.insert(Value::String(field.to_string()), Value::String(text));
                }
                Err(e) => {
                    warn!("Cover field '{}' left untranslated: {}", field, e);
                }
            }
        }
    }
}

/// Rewrite a canonical URL path for a target language.
///
/// The language code is inserted as the first path segment, exactly once:
/// repeated application never double-prefixes, and the canonical language
/// is left untouched.
pub fn rewrite_url(url: &str, language: &str) -> String {
    if language == DEFAULT_LANGUAGE || url.is_empty() {
        return url.to_string();
    }

    let prefix = format!("/{}/", language);
    if url.starts_with(&prefix) {
        return url.to_string();
    }

    format!("/{}/{}", language, url.trim_start_matches('/'))
}

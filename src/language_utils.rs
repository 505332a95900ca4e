use std::collections::HashMap;
use isolang::Language;
use once_cell::sync::Lazy;

/// Language utilities for target-language code handling
///
/// Target languages are configured as lower-case codes (mostly ISO 639-1,
/// plus a few site-specific variants such as `zh-hant`). This module
/// normalizes codes and resolves the English display names used in
/// translation prompts.

/// Display names for codes that isolang cannot resolve on its own, or where
/// the site uses a more specific name than the bare ISO entry.
static DISPLAY_NAME_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("zh", "Chinese (Simplified)"),
        ("zh-hant", "Chinese (Traditional)"),
        ("fa", "Persian/Farsi"),
    ])
});

/// Normalize a language code for comparison and file naming
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Resolve the English display name for a language code.
///
/// Falls back to the code itself when the code is unknown, so prompts stay
/// usable even for unrecognized site-specific codes.
pub fn display_name(code: &str) -> String {
    let normalized = normalize_code(code);

    if let Some(name) = DISPLAY_NAME_OVERRIDES.get(normalized.as_str()) {
        return (*name).to_string();
    }

    if normalized.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized) {
            return lang.to_name().to_string();
        }
    } else if normalized.len() == 3 {
        if let Some(lang) = Language::from_639_3(&normalized) {
            return lang.to_name().to_string();
        }
    }

    normalized
}

/// Check whether a code is one the tool can name.
///
/// Used to validate explicit `--lang` selections early instead of sending an
/// unknown code to the provider.
pub fn is_known_code(code: &str) -> bool {
    let normalized = normalize_code(code);
    DISPLAY_NAME_OVERRIDES.contains_key(normalized.as_str())
        || (normalized.len() == 2 && Language::from_639_1(&normalized).is_some())
        || (normalized.len() == 3 && Language::from_639_3(&normalized).is_some())
}

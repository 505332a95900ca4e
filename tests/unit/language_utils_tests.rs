/*!
 * Tests for language code utilities
 */

use postglot::language_utils::{display_name, is_known_code, normalize_code};

#[test]
fn test_displayName_withIsoCode_shouldResolveEnglishName() {
    assert_eq!(display_name("ar"), "Arabic");
    assert_eq!(display_name("de"), "German");
    assert_eq!(display_name("fr"), "French");
}

#[test]
fn test_displayName_withOverriddenCodes_shouldUseSiteNames() {
    assert_eq!(display_name("zh"), "Chinese (Simplified)");
    assert_eq!(display_name("zh-hant"), "Chinese (Traditional)");
    assert_eq!(display_name("fa"), "Persian/Farsi");
}

#[test]
fn test_displayName_withUnknownCode_shouldFallBackToCode() {
    assert_eq!(display_name("xx"), "xx");
}

#[test]
fn test_displayName_shouldNormalizeCase() {
    assert_eq!(display_name(" AR "), "Arabic");
}

#[test]
fn test_normalizeCode_shouldTrimAndLowercase() {
    assert_eq!(normalize_code(" Zh-Hant "), "zh-hant");
}

#[test]
fn test_isKnownCode_shouldAcceptIsoAndOverrides() {
    assert!(is_known_code("ar"));
    assert!(is_known_code("zh-hant"));
    assert!(!is_known_code("xx"));
}

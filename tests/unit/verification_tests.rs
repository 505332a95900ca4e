/*!
 * Tests for artifact verification
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use postglot::document::Document;
use postglot::verification::{RejectReason, Verdict, VerificationConfig, VerificationEngine};
use crate::common;

fn write_artifact(dir: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join("index.ar.md");
    fs::write(&path, content)?;
    Ok(path)
}

fn original() -> Document {
    Document::parse(&format!(
        "---\n{}---\n\n{}",
        common::SAMPLE_FRONT_MATTER,
        common::SAMPLE_BODY
    ))
}

/// A translated artifact differs in title and headings and is accepted
#[test]
fn test_verify_withTranslatedArtifact_shouldAccept() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = write_artifact(
        temp_dir.path(),
        "---\ntitle: Translated title entirely different\n\
         description: Translated description of the post content.\n\
         ---\n\n# Completely different heading\n\n\
         A translated body that is comfortably longer than the minimum \
         threshold for the verification gate.\n",
    )?;

    let verdict = VerificationEngine::new().verify(&artifact, Some(&original()));

    assert_eq!(verdict, Verdict::Accepted);
    Ok(())
}

#[test]
fn test_verify_withMissingFile_shouldReject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let verdict = VerificationEngine::new()
        .verify(&temp_dir.path().join("index.ar.md"), Some(&original()));

    assert_eq!(verdict, Verdict::Rejected(RejectReason::Unreadable));
    Ok(())
}

#[test]
fn test_verify_withTinyArtifact_shouldReject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = write_artifact(temp_dir.path(), "---\ntitle: X\n---\n\nshort")?;

    let verdict = VerificationEngine::new().verify(&artifact, Some(&original()));

    assert_eq!(verdict, Verdict::Rejected(RejectReason::TooShort));
    Ok(())
}

#[test]
fn test_verify_withoutHeaderDelimiter_shouldReject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "a".repeat(200);
    let artifact = write_artifact(temp_dir.path(), &content)?;

    let verdict = VerificationEngine::new().verify(&artifact, Some(&original()));

    assert_eq!(verdict, Verdict::Rejected(RejectReason::MalformedHeader));
    Ok(())
}

#[test]
fn test_verify_withShortBody_shouldReject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let filler = "x".repeat(120);
    let content = format!("---\ntitle: {}\n---\n\ntiny body", filler);
    let artifact = write_artifact(temp_dir.path(), &content)?;

    let verdict = VerificationEngine::new().verify(&artifact, Some(&original()));

    assert_eq!(verdict, Verdict::Rejected(RejectReason::BodyTooShort));
    Ok(())
}

/// Scenario D: output identical to the original is rejected as untranslated
#[test]
fn test_verify_withIdenticalContent_shouldReject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = write_artifact(temp_dir.path(), &original().serialize())?;

    let verdict = VerificationEngine::new().verify(&artifact, Some(&original()));

    assert_eq!(verdict, Verdict::Rejected(RejectReason::NotTranslated));
    Ok(())
}

/// Changed headings alone are enough, even with an unchanged header
#[test]
fn test_verify_withOnlyHeadingsChanged_shouldAccept() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut translated = original();
    translated.body = common::SAMPLE_BODY.replace("# Compare Word Documents", "# Translated");
    let artifact = write_artifact(temp_dir.path(), &translated.serialize())?;

    let verdict = VerificationEngine::new().verify(&artifact, Some(&original()));

    assert_eq!(verdict, Verdict::Accepted);
    Ok(())
}

/// Scenario E: no headings to compare and an unchanged header is accepted
/// leniently, consistently on every run
#[test]
fn test_verify_withNoHeadings_shouldAcceptLeniently() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = "A plain body without any headings that still clears the body \
                length threshold for verification purposes.";
    let source = Document::parse(&format!(
        "---\n{}---\n\n{}",
        common::SAMPLE_FRONT_MATTER,
        body
    ));
    let artifact = write_artifact(temp_dir.path(), &source.serialize())?;

    let engine = VerificationEngine::new();
    let first = engine.verify(&artifact, Some(&source));
    let second = engine.verify(&artifact, Some(&source));

    assert_eq!(first, Verdict::AcceptedWithWarning);
    assert_eq!(first, second);
    Ok(())
}

/// Without an original to compare, structural checks alone decide
#[test]
fn test_verify_withoutOriginal_shouldAcceptStructurallySound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = write_artifact(temp_dir.path(), &original().serialize())?;

    let verdict = VerificationEngine::new().verify(&artifact, None);

    assert_eq!(verdict, Verdict::Accepted);
    Ok(())
}

/// Verification is idempotent on an unchanged artifact
#[test]
fn test_verify_isIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = write_artifact(temp_dir.path(), &original().serialize())?;

    let engine = VerificationEngine::new();
    let first = engine.verify(&artifact, Some(&original()));
    let second = engine.verify(&artifact, Some(&original()));

    assert_eq!(first, second);
    Ok(())
}

/// Thresholds are configurable
#[test]
fn test_verify_withCustomThresholds_shouldUseThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = write_artifact(temp_dir.path(), "---\ntitle: Tiny translated\n---\n\nbody ok")?;

    let engine = VerificationEngine::with_config(VerificationConfig {
        min_total_chars: 10,
        min_body_chars: 4,
    });
    let verdict = engine.verify(&artifact, None);

    assert_eq!(verdict, Verdict::Accepted);
    Ok(())
}

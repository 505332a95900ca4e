use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// File name of the canonical (default-language) document in a post directory
pub const CANONICAL_FILE: &str = "index.md";

/// Extension shared by canonical documents and their variants
pub const DOCUMENT_EXTENSION: &str = "md";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Path of the canonical document inside a post directory
    pub fn canonical_path<P: AsRef<Path>>(post_dir: P) -> PathBuf {
        post_dir.as_ref().join(CANONICAL_FILE)
    }

    /// Path of a translated variant inside a post directory.
    ///
    /// Variants follow the `<stem>.<langCode>.<ext>` convention, so the
    /// French variant of `index.md` is `index.fr.md`.
    pub fn variant_path<P: AsRef<Path>>(post_dir: P, language: &str) -> PathBuf {
        let mut file_name = String::from("index.");
        file_name.push_str(language);
        file_name.push('.');
        file_name.push_str(DOCUMENT_EXTENSION);
        post_dir.as_ref().join(file_name)
    }

    /// Extract the language code from a variant file name, if it is one.
    ///
    /// `index.ar.md` yields `Some("ar")`; the canonical `index.md` and
    /// unrelated files yield `None`.
    pub fn variant_language(file_name: &str) -> Option<&str> {
        let parts: Vec<&str> = file_name.split('.').collect();
        match parts.as_slice() {
            ["index", lang, ext] if *ext == DOCUMENT_EXTENSION && !lang.is_empty() => Some(lang),
            _ => None,
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Best-effort file removal; a failure is reported but never propagated
    pub fn remove_file_best_effort<P: AsRef<Path>>(path: P) {
        let path = path.as_ref();
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                log::warn!("Failed to remove {:?}: {}", path, e);
            }
        }
    }
}

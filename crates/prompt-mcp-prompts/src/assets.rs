//! Instruction texts read once at startup.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// File holding the `essay-lecture` instructions.
pub const LECTURE_FILE: &str = "essay-lecture.txt";
/// File holding the `essay-grading` instructions.
pub const GRADING_FILE: &str = "essay-grading.txt";

/// Asset loading error. Always fatal at startup.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read prompt file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Prompt file is empty: {0}")]
    Empty(PathBuf),
}

/// Instruction texts for both templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAssets {
    pub lecture: String,
    pub grading: String,
}

impl PromptAssets {
    #[must_use]
    pub fn new(lecture: impl Into<String>, grading: impl Into<String>) -> Self {
        Self {
            lecture: lecture.into(),
            grading: grading.into(),
        }
    }

    /// Load both texts from `dir`, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns error if either file is missing, unreadable or blank.
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let lecture = read_text(&dir.join(LECTURE_FILE))?;
        let grading = read_text(&dir.join(GRADING_FILE))?;
        tracing::info!(dir = %dir.display(), "Loaded prompt texts");
        Ok(Self { lecture, grading })
    }
}

fn read_text(path: &Path) -> Result<String, AssetError> {
    let text = fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_trims() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LECTURE_FILE), "\n  lecture body \n").unwrap();
        fs::write(dir.path().join(GRADING_FILE), "grading body\n").unwrap();

        let assets = PromptAssets::load(dir.path()).unwrap();
        assert_eq!(assets, PromptAssets::new("lecture body", "grading body"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LECTURE_FILE), "lecture").unwrap();

        let err = PromptAssets::load(dir.path()).unwrap_err();
        match err {
            AssetError::Read { path, .. } => assert!(path.ends_with(GRADING_FILE)),
            other => panic!("Wrong error: {other}"),
        }
    }

    #[test]
    fn test_blank_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LECTURE_FILE), "   \n").unwrap();
        fs::write(dir.path().join(GRADING_FILE), "grading").unwrap();

        assert!(matches!(
            PromptAssets::load(dir.path()),
            Err(AssetError::Empty(_))
        ));
    }
}

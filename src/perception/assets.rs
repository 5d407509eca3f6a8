//! Locale asset integrity

use super::error::{PerceptionError, PerceptionResult};
use std::collections::BTreeSet;
use std::path::Path;

/// Locale every other locale is compared against
pub const REFERENCE_LOCALE: &str = "en";

fn file_names(dir: &Path) -> PerceptionResult<BTreeSet<String>> {
    let entries = std::fs::read_dir(dir).map_err(|source| PerceptionError::AssetDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Files present for the reference locale but missing for `language`
///
/// Returned sorted; an empty list means the locale is complete.
pub fn verify_assets(static_root: &Path, language: &str) -> PerceptionResult<Vec<String>> {
    if language == REFERENCE_LOCALE {
        return Ok(Vec::new());
    }

    let reference = file_names(&static_root.join(REFERENCE_LOCALE))?;
    let target = file_names(&static_root.join(language))?;
    let missing: Vec<String> = reference.difference(&target).cloned().collect();

    for name in &missing {
        log::error!("Image {name} is missing for language '{language}'");
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn locale(root: &Path, language: &str, files: &[&str]) {
        let dir = root.join(language);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"png").unwrap();
        }
    }

    #[test]
    fn test_complete_locale() {
        let root = tempfile::tempdir().unwrap();
        locale(root.path(), "en", &["get.png", "keep.png"]);
        locale(root.path(), "ru", &["keep.png", "get.png", "extra.png"]);

        assert!(verify_assets(root.path(), "ru").unwrap().is_empty());
    }

    #[test]
    fn test_missing_files_are_sorted() {
        let root = tempfile::tempdir().unwrap();
        locale(root.path(), "en", &["yes.png", "get.png", "keep.png", "ok.png"]);
        locale(root.path(), "zh-TW", &["keep.png"]);

        assert_eq!(
            verify_assets(root.path(), "zh-TW").unwrap(),
            vec!["get.png", "ok.png", "yes.png"]
        );
    }

    #[test]
    fn test_reference_locale_always_passes() {
        let root = tempfile::tempdir().unwrap();
        assert!(verify_assets(root.path(), "en").unwrap().is_empty());
    }

    #[test]
    fn test_missing_locale_directory() {
        let root = tempfile::tempdir().unwrap();
        locale(root.path(), "en", &["get.png"]);

        let err = verify_assets(root.path(), "de").unwrap_err();
        assert!(matches!(err, PerceptionError::AssetDirectory { .. }));
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        locale(root.path(), "en", &["get.png"]);
        fs::create_dir_all(root.path().join("en").join("nested")).unwrap();
        locale(root.path(), "ru", &["get.png"]);

        assert!(verify_assets(root.path(), "ru").unwrap().is_empty());
    }
}

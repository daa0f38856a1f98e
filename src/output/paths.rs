// src/output/paths.rs
//! Pure functions for path calculations and directory naming.
//!
//! Nothing here touches the filesystem.

use crate::constants::DOCUMENT_FILE_NAME;
use crate::error::AppError;
use crate::types::NotionId;
use std::path::{Path, PathBuf};

/// Directory name for a page: slug of the title, then the short id.
///
/// The short id keeps siblings with the same title apart; it is only 8 hex
/// characters, so two distinct pages sharing a title and id prefix collide.
pub fn page_dir_name(title: &str, id: &NotionId) -> String {
    let mut slug = slug::slugify(title);
    if slug.is_empty() {
        slug = "untitled".to_string();
    }
    format!("{}_{}", slug, id.short())
}

/// Location of a page's markdown document inside its directory.
pub fn document_path(page_dir: &Path) -> PathBuf {
    page_dir.join(DOCUMENT_FILE_NAME)
}

/// Expresses `path` relative to the directory `base`, with forward slashes
/// for Markdown links.
pub fn relativize(path: &Path, base: &Path) -> Result<String, AppError> {
    let relative = pathdiff::diff_paths(path, base).ok_or_else(|| AppError::PathOutsideBase {
        path: path.to_path_buf(),
        base: base.to_path_buf(),
    })?;

    Ok(relative.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> NotionId {
        NotionId::parse("3f2a9c10aaaabbbbccccddddeeeeffff").unwrap()
    }

    #[test]
    fn test_page_dir_name() {
        assert_eq!(page_dir_name("Getting Started", &id()), "getting-started_3f2a9c10");
        assert_eq!(page_dir_name("Q3: Plans / Notes!", &id()), "q3-plans-notes_3f2a9c10");
    }

    #[test]
    fn test_page_dir_name_without_usable_title() {
        assert_eq!(page_dir_name("", &id()), "untitled_3f2a9c10");
        assert_eq!(page_dir_name("!!!", &id()), "untitled_3f2a9c10");
    }

    #[test]
    fn test_document_path() {
        assert_eq!(
            document_path(Path::new("out/root_1234abcd")),
            PathBuf::from("out/root_1234abcd/index.md")
        );
    }

    #[test]
    fn test_relativize_descendant() {
        let base = Path::new("/out/page");
        let path = Path::new("/out/page/assets/ab12.png");
        assert_eq!(relativize(path, base).unwrap(), "assets/ab12.png");
    }

    #[test]
    fn test_relativize_sibling() {
        let base = Path::new("/out/page/child");
        let path = Path::new("/out/page/assets/ab12.png");
        assert_eq!(relativize(path, base).unwrap(), "../assets/ab12.png");
    }

    #[test]
    fn test_relativize_mismatched_roots() {
        let result = relativize(Path::new("relative/file.png"), Path::new("/absolute/base"));
        assert!(matches!(result, Err(AppError::PathOutsideBase { .. })));
    }
}

// src/output/writer.rs
//! The filesystem capability.
//!
//! This module is the only place where file I/O operations occur, keeping
//! the rest of the codebase testable against an in-memory or temporary tree.

use crate::error::AppError;
use std::fs;
use std::path::Path;

/// The ability to persist export output.
pub trait Store: Send + Sync {
    /// Creates a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<(), AppError>;

    /// Reports whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Writes `content` to `path`, replacing any previous file.
    fn write(&self, path: &Path, content: &[u8]) -> Result<(), AppError>;
}

/// `Store` backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl Store for LocalStore {
    fn create_dir_all(&self, path: &Path) -> Result<(), AppError> {
        if path.is_dir() {
            return Ok(());
        }
        if path.exists() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("Path exists but is not a directory: {}", path.display()),
            )));
        }

        fs::create_dir_all(path)?;
        log::debug!("Created directory: {}", path.display());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<(), AppError> {
        log::debug!("Writing {} bytes to {}", content.len(), path.display());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write next to the target, then rename, so readers never see a partial file.
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = path.with_file_name(format!(".{}.partial", file_name));
        fs::write(&staging, content)?;
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        Ok(())
    }
}

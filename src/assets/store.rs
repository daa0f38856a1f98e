// src/assets/store.rs
//! Content-addressed asset storage.
//!
//! An asset's file name is the SHA-256 of its bytes plus an extension taken
//! from the source URL, so the same bytes always land at the same name no
//! matter which URL served them.

use crate::constants::{FALLBACK_ASSET_EXTENSION, MAX_ASSET_EXTENSION_LEN};
use crate::error::AppError;
use crate::output::Store;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Where an asset ended up and whether this call wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub path: PathBuf,
    pub created: bool,
}

/// Writes assets under content-derived names through a `Store`.
#[derive(Clone)]
pub struct AssetStore {
    store: Arc<dyn Store>,
}

impl AssetStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Places `bytes` in `dest_dir` unless a file with the same content name
    /// is already there.
    pub fn materialize(
        &self,
        bytes: &[u8],
        source_url: &str,
        dest_dir: &Path,
    ) -> Result<Materialized, AppError> {
        let path = dest_dir.join(asset_file_name(bytes, source_url));

        if self.store.exists(&path) {
            log::debug!("Asset already present: {}", path.display());
            return Ok(Materialized {
                path,
                created: false,
            });
        }

        self.store.create_dir_all(dest_dir)?;
        self.store.write(&path, bytes)?;
        log::info!("Wrote asset {} ({} bytes)", path.display(), bytes.len());

        Ok(Materialized {
            path,
            created: true,
        })
    }
}

/// Content hash of `bytes` followed by the URL's file extension.
pub fn asset_file_name(bytes: &[u8], source_url: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    format!("{}{}", digest, extension_of(source_url))
}

/// Extension of the last path segment of `url`, dot included.
///
/// Query strings and fragments are ignored. Anything that does not look
/// like a short alphanumeric extension yields the fallback.
fn extension_of(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or_default();
    let extension = Path::new(segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_ASSET_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!(".{}", ext),
        None => FALLBACK_ASSET_EXTENSION.to_string(),
    }
}

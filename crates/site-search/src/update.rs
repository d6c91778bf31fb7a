/// Update service for the content registry.
///
/// Fingerprints the content directory and re-parses it only when the
/// fingerprint changed. Runs at startup and on demand via the
/// `reload_content` tool. The built-in registry never changes.
use std::path::Path;

use sha2::{Digest, Sha256};
use site_common::error::CommonError;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::model::SearchItem;
use crate::parser;
use crate::registry;

pub const BUILTIN_FINGERPRINT: &str = "builtin";

/// Result of an update operation.
pub struct UpdateResult {
    /// Whether the registry was replaced (false if already up to date).
    pub updated: bool,
    pub fingerprint: String,
    /// Number of items after the update; 0 when nothing was reloaded.
    pub item_count: usize,
}

pub struct UpdateService {
    config: Config,
    loaded: Mutex<Option<String>>,
}

impl UpdateService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            loaded: Mutex::new(None),
        }
    }

    /// SHA-256 over every content file's relative path and bytes, in load order.
    pub fn fingerprint(&self) -> Result<String, AppError> {
        match self.config.content_root() {
            Some(root) => fingerprint_dir(&root),
            None => Ok(BUILTIN_FINGERPRINT.to_string()),
        }
    }

    pub async fn needs_update(&self) -> Result<bool, AppError> {
        let current = self.fingerprint()?;
        let loaded = self.loaded.lock().await;
        Ok(loaded.as_deref() != Some(current.as_str()))
    }

    /// Load the full registry and remember its fingerprint.
    pub async fn load(&self) -> Result<(Vec<SearchItem>, String), AppError> {
        let fingerprint = self.fingerprint()?;
        let items = match self.config.content_root() {
            Some(root) => parser::parse_content_dir(&root)?,
            None => registry::builtin_items(),
        };
        *self.loaded.lock().await = Some(fingerprint.clone());
        info!(fingerprint = %fingerprint, items = items.len(), "content loaded");
        Ok((items, fingerprint))
    }

    /// Reload only if the content changed since the last load.
    pub async fn update(&self) -> Result<(UpdateResult, Option<Vec<SearchItem>>), AppError> {
        if !self.needs_update().await? {
            let fingerprint = self.fingerprint()?;
            info!(fingerprint = %fingerprint, "content up to date, skipping reload");
            return Ok((
                UpdateResult {
                    updated: false,
                    fingerprint,
                    item_count: 0,
                },
                None,
            ));
        }

        let (items, fingerprint) = self.load().await?;
        Ok((
            UpdateResult {
                updated: true,
                fingerprint,
                item_count: items.len(),
            },
            Some(items),
        ))
    }
}

fn fingerprint_dir(root: &Path) -> Result<String, AppError> {
    let mut hasher = Sha256::new();
    for (_, path) in parser::content_files(root)? {
        let bytes = std::fs::read(&path).map_err(CommonError::from)?;
        let rel = path.strip_prefix(root).unwrap_or(&path);
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update(b"\0");
        hasher.update(&bytes);
        hasher.update(b"\0");
    }
    Ok(format!("{:x}", hasher.finalize()))
}

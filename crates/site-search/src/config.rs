use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::parser::{ARTICLES_DIR, GUIDES_DIR};

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Markdown content directory. `None` serves the built-in registry.
    pub content_path: Option<String>,
}

impl Config {
    /// Optional:
    /// - `SITE_CONTENT_PATH`: directory holding `guides/` and/or `articles/`
    pub fn from_env() -> Result<Self, AppError> {
        let content_path = std::env::var("SITE_CONTENT_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());
        Self::with_content_path(content_path)
    }

    pub fn with_content_path(content_path: Option<String>) -> Result<Self, AppError> {
        if let Some(path) = content_path.as_deref() {
            let root = Path::new(path);
            if !root.is_dir() {
                return Err(AppError::Config(format!(
                    "content directory not found: {}",
                    root.display()
                )));
            }
            if !root.join(GUIDES_DIR).is_dir() && !root.join(ARTICLES_DIR).is_dir() {
                return Err(AppError::Config(format!(
                    "content directory {} has neither {GUIDES_DIR}/ nor {ARTICLES_DIR}/",
                    root.display()
                )));
            }
        }
        Ok(Self { content_path })
    }

    pub fn content_root(&self) -> Option<PathBuf> {
        self.content_path.as_deref().map(PathBuf::from)
    }
}

//! Stored credentials
//!
//! The backend issues a bearer token at account creation; we persist it under
//! the config directory and clear it when the backend rejects it.

use std::path::Path;

use atelier_utils::{paths, AtelierError, Result};

/// Bearer token for the atelier backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The raw bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Load stored credentials, if any.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&paths::token_file())
    }

    /// Persist the token for later sessions.
    pub fn store(&self) -> Result<()> {
        self.store_to(&paths::token_file())
    }

    /// Delete stored credentials. Missing file is not an error.
    pub fn clear() -> Result<()> {
        Self::clear_at(&paths::token_file())
    }

    pub(crate) fn load_from(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Self::new(token)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AtelierError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    pub(crate) fn store_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        std::fs::write(path, &self.token).map_err(|e| AtelierError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub(crate) fn clear_at(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AtelierError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }
}

impl std::fmt::Display for Credentials {
    // Never print the token itself
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credentials(****)")
    }
}

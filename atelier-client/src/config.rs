//! Client configuration
//!
//! Resolution order: CLI flag / ATELIER_API env override, then
//! `~/.config/atelier/config.toml`, then the default local backend.

use std::path::Path;

use serde::Deserialize;
use url::Url;

use atelier_utils::{paths, AtelierError, Result};

/// Backend base URL used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// On-disk configuration shape
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base: Option<String>,
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (http:// or https://)
    pub api_base: Url,
}

impl ClientConfig {
    /// Load configuration, applying an optional override on top of the
    /// config file.
    pub fn load(api_override: Option<&str>) -> Result<Self> {
        Self::load_from(&paths::config_file(), api_override)
    }

    fn load_from(path: &Path, api_override: Option<&str>) -> Result<Self> {
        let file_config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<FileConfig>(&contents)
                .map_err(|e| AtelierError::config(format!("Invalid config file: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                return Err(AtelierError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let base = api_override
            .map(str::to_string)
            .or(file_config.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let api_base = Url::parse(&base)
            .map_err(|e| AtelierError::config(format!("Invalid API base URL {}: {}", base, e)))?;

        Ok(Self { api_base })
    }

    /// WebSocket URL for a chat session, derived from the API base.
    ///
    /// `http` maps to `ws` and `https` to `wss`; the bearer token travels as
    /// a query parameter because WebSocket handshakes carry no custom
    /// headers from browsers and the backend accepts both.
    pub fn ws_url(&self, chat_id: i64, token: &str) -> Result<Url> {
        let mut url = self
            .api_base
            .join(&format!("/api/ws/chat/{}", chat_id))
            .map_err(|e| AtelierError::config(format!("Invalid session URL: {}", e)))?;

        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(AtelierError::config(format!(
                    "Unsupported API scheme: {}",
                    other
                )))
            }
        };
        // http and ws are both special schemes, so set_scheme cannot fail here
        let _ = url.set_scheme(scheme);

        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }
}

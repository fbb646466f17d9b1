//! Environment configuration for the client.

use crate::error::{ClientError, Result};
use crate::schema::ApiVersion;

pub const DEFAULT_BASE_URL: &str = "https://api.ghostsecurity.ai/v1";

#[derive(Debug, Clone)]
pub struct GhostConfig {
    pub api_key: String,
    pub base_url: String,
    /// When set, listing operations are scoped to this repository and the
    /// `repo_id` tool argument becomes optional.
    pub repo_id: Option<String>,
    pub api_version: ApiVersion,
}

impl GhostConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            repo_id: None,
            api_version: ApiVersion::default(),
        }
    }

    /// Resolve configuration from the environment, with positional CLI
    /// arguments as fallbacks for the API key and repository id.
    pub fn from_env(args: &[String]) -> Result<Self> {
        let api_key = std::env::var("GHOST_SECURITY_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| args.first().cloned())
            .ok_or(ClientError::MissingParameter("GHOST_SECURITY_API_KEY"))?;

        let base_url = std::env::var("GHOST_SECURITY_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let repo_id = std::env::var("GHOST_SECURITY_REPO_ID")
            .ok()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| args.get(1).cloned());

        let api_version = match std::env::var("GHOST_SECURITY_API_VERSION") {
            Ok(raw) => ApiVersion::parse(&raw).unwrap_or_else(|| {
                log::warn!("unknown GHOST_SECURITY_API_VERSION '{raw}'; defaulting to v2");
                ApiVersion::default()
            }),
            Err(_) => ApiVersion::default(),
        };

        Ok(Self {
            api_key,
            base_url,
            repo_id,
            api_version,
        })
    }
}

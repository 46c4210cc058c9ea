use std::env;

use serde::{Deserialize, Serialize};

/// Browser-like identity; the site serves bot user agents a different page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/70.0.3538.67 Safari/537.36";

#[derive(Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Deadline for the single GET, in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn new() -> Self {
        let timeout_secs = env::var("CAMDICT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let user_agent =
            env::var("CAMDICT_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        Self {
            timeout_secs,
            user_agent,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}

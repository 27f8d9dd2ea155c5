// Runtime configuration, read from the environment with built-in
// fallbacks in the same way the API client used to read its gateway URL.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const TOKEN_FILE_NAME: &str = ".gitup_token";

pub const API_URL_VAR: &str = "GITUP_API_URL";
pub const TOKEN_PATH_VAR: &str = "GITUP_TOKEN_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub token_path: PathBuf,
}

impl Config {
    /// Build a config from `GITUP_API_URL` and `GITUP_TOKEN_PATH`, falling
    /// back to the public GitHub API and `~/.gitup_token`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_empty(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.into());
        let token_path = non_empty(TOKEN_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_token_path);

        Config {
            api_url,
            token_path,
        }
    }
}

/// `~/.gitup_token`, or `./.gitup_token` when there is no home directory.
pub fn default_token_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(TOKEN_FILE_NAME)
}

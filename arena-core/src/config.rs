use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The configuration of the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The base url every API path is appended to
    pub api_url: String,
    /// How many entries to request for the leaderboard
    pub leaderboard_limit: u32,
    /// Where the session is persisted between runs
    pub storage_path: PathBuf,
}

impl Config {
    pub const DEFAULT_API_URL: &'static str = "http://localhost:8000/api";
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            leaderboard_limit: 10,
            storage_path: PathBuf::from("./arena-session.ron"),
        }
    }
}

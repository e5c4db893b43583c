use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use arena_core::Config;
use log::debug;
use thiserror::Error;

const CONFIG_PATH_VAR: &str = "ARENA_CONFIG";
const API_URL_VAR: &str = "ARENA_API_URL";
const DEFAULT_CONFIG_PATH: &str = "./arena.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Loads the config file, then applies overrides from the environment.
///
/// The file is optional when it's the default one. An explicitly given
/// path has to exist.
pub fn load() -> Result<Config, ConfigError> {
    let explicit = env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);

    let mut config = match explicit {
        Some(path) => read(&path)?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);

            if path.exists() {
                read(&path)?
            } else {
                debug!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    if let Ok(api_url) = env::var(API_URL_VAR) {
        config.api_url = api_url;
    }

    Ok(config)
}

fn read(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;

    parse(&data).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

fn parse(data: &str) -> Result<Config, ron::error::SpannedError> {
    ron::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse(r#"(api_url: "https://arena.gg/api")"#).unwrap();

        assert_eq!(config.api_url, "https://arena.gg/api");
        assert_eq!(config.leaderboard_limit, Config::default().leaderboard_limit);
    }

    #[test]
    fn test_invalid_config() {
        assert!(parse("(leaderboard_limit: \"ten\")").is_err());
    }
}

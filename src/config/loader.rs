use crate::config::Config;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tokio::fs;

/// Load configuration with priority: explicit path > config files > defaults,
/// then environment overrides on top.
pub async fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let mut config = if let Some(path) = config_path {
        load_config_file(&path).await?
    } else {
        load_config_from_default_locations().await?
    };

    apply_env_overrides(&mut config);

    Ok(config)
}

async fn load_config_from_default_locations() -> Result<Config> {
    for path in get_config_search_paths() {
        if path.exists() {
            match load_config_file(&path).await {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!("Warning: failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(Config::default())
}

fn get_config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from(".promptline.json"));

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("promptline").join("config.json"));
        paths.push(home.join(".promptline.json"));
    }

    paths
}

async fn load_config_file(path: &PathBuf) -> Result<Config> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(value) = env::var("PROMPTLINE_FINAL_SPACE") {
        config.final_space = !matches!(value.as_str(), "0" | "false" | "no");
    }
}

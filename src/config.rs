use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use charty_core::models::DEFAULT_ADMIN_PASSWORD;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Either "file" (JSON documents under `data_dir`) or "sqlite".
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_backend() -> String {
    "file".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory served at `/` for images and other static assets.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_bind() -> String {
    "127.0.0.1:8470".to_string()
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("./public")
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    #[serde(default = "default_password")]
    pub password: String,
    /// Mark the session cookie `Secure`. Enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_password(),
            secure_cookies: false,
        }
    }
}

fn default_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    match config.store.backend.as_str() {
        "file" | "sqlite" => {}
        other => anyhow::bail!("Unknown store backend: '{}'. Must be file or sqlite.", other),
    }

    if config.admin.password.trim().is_empty() {
        anyhow::bail!("admin.password must not be empty");
    }

    Ok(config)
}

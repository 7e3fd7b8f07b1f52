use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    API_URL_ENV, CONFIG_ENV_PREFIX, DEFAULT_API_URL, LOG_FILE_NAME, UI_TITLE,
};
use crate::utils::CureLinkError;

const LOCAL_CONFIG_PATH: &str = ".curelink/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoints hang off, e.g. `http://localhost:8000/api`
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIConfig {
    /// Header title
    pub title: String,
    /// Show the local time next to each message
    pub show_timestamps: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            title: UI_TITLE.to_string(),
            show_timestamps: false,
        }
    }
}

/// Load configuration from multiple sources
///
/// Defaults, then the global config file, then `.curelink/config.toml`, then
/// `CURELINK_*` environment variables.
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    load_layered(Some(&global_config), Path::new(LOCAL_CONFIG_PATH))
}

/// Load configuration from a single explicit file (plus env overrides)
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(
            CureLinkError::ConfigError(format!("Config file not found: {}", path.display())).into(),
        );
    }
    with_env(Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path)))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn load_layered(global_config: Option<&Path>, local_config: &Path) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(global) = global_config.filter(|p| p.exists()) {
        figment = figment.merge(Toml::file(global));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(local_config));
    }

    with_env(figment)
        .extract()
        .context("Failed to load configuration")
}

fn with_env(figment: Figment) -> Figment {
    figment
        // CURELINK_API__BASE_URL, CURELINK_UI__SHOW_TIMESTAMPS, ...
        .merge(Env::prefixed(CONFIG_ENV_PREFIX).split("__"))
        // CURELINK_API_URL is the short form for the base URL
        .merge(
            Env::raw()
                .only(&[API_URL_ENV])
                .map(|_| "api.base_url".into()),
        )
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "curelink")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = project_dirs() {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("curelink");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Where the interactive client writes its log
pub fn log_file_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_FILE_NAME))
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
///
/// Returns the path of the newly written file, `None` if one was there.
pub fn init_config() -> Result<Option<PathBuf>> {
    let config_file = get_config_dir()?.join("config.toml");
    if config_file.exists() {
        return Ok(None);
    }
    save_config(&Config::default(), Some(config_file.clone()))?;
    Ok(Some(config_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.ui.title, "CureLink Assistant");
    }

    #[test]
    fn test_endpoint_join() {
        let api = ApiConfig {
            base_url: "https://care.example.com/api/".to_string(),
        };
        assert_eq!(api.endpoint("/chat"), "https://care.example.com/api/chat");
        assert_eq!(
            ApiConfig::default().endpoint("/auth/register"),
            "http://localhost:8000/api/auth/register"
        );
    }

    #[test]
    fn test_layering_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "global.toml",
                r#"
                [api]
                base_url = "http://global:8000/api"

                [ui]
                show_timestamps = true
                "#,
            )?;
            jail.create_file(
                "local.toml",
                r#"
                [api]
                base_url = "http://local:8000/api"
                "#,
            )?;

            let config = load_layered(Some(Path::new("global.toml")), Path::new("local.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.api.base_url, "http://local:8000/api");
            assert!(config.ui.show_timestamps);

            jail.set_env("CURELINK_API_URL", "http://env:9000/api");
            let config = load_layered(Some(Path::new("global.toml")), Path::new("local.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.api.base_url, "http://env:9000/api");

            Ok(())
        });
    }

    #[test]
    fn test_nested_env_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("CURELINK_UI__TITLE", "Clinic Desk");
            let config = load_layered(None, Path::new("missing.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.ui.title, "Clinic Desk");
            assert_eq!(config.api.base_url, "http://localhost:8000/api");
            Ok(())
        });
    }

    #[test]
    fn test_save_and_reload_file() {
        // Inside a jail so no concurrent test's env override leaks in
        Jail::expect_with(|_jail| {
            let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
            let path = dir.path().join("config.toml");
            let mut config = Config::default();
            config.api.base_url = "http://saved:8000/api".to_string();

            save_config(&config, Some(path.clone())).map_err(|e| e.to_string())?;
            let loaded = load_config_file(&path).map_err(|e| e.to_string())?;

            assert_eq!(loaded.api.base_url, "http://saved:8000/api");
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_file(&dir.path().join("nope.toml")).is_err());
    }
}

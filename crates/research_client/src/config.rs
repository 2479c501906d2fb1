//! Client config load/save for `~/.research-ui/config.yaml`.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Endpoint used when nothing is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV_VAR: &str = "RESEARCH_UI_CONFIG";

/// Client section (endpoint).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClientSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Full config file.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientSection,
}

impl Config {
    /// Configured endpoint, falling back to [`DEFAULT_ENDPOINT`].
    pub fn endpoint(&self) -> &str {
        self.client
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.client.endpoint = Some(endpoint.into());
    }
}

/// Returns the default config file path: `~/.research-ui/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".research-ui").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Where the config lives and whether the user named it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub explicit: bool,
}

/// Resolve the config path: explicit flag, then `RESEARCH_UI_CONFIG`, then the default.
pub fn resolve_config_path(flag: Option<&Path>) -> Result<ConfigLocation, ConfigError> {
    if let Some(p) = flag {
        return Ok(ConfigLocation {
            path: p.to_path_buf(),
            explicit: true,
        });
    }
    if let Some(val) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(ConfigLocation {
            path: PathBuf::from(val),
            explicit: true,
        });
    }
    default_config_path()
        .map(|path| ConfigLocation {
            path,
            explicit: false,
        })
        .ok_or(ConfigError::NoHome)
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Load the resolved config. A missing file at the default location yields defaults.
pub fn load_or_default(location: &ConfigLocation) -> Result<Config, ConfigError> {
    if !location.explicit && !location.path.exists() {
        log::debug!(
            "no config at {}, using defaults",
            location.path.display()
        );
        return Ok(Config::default());
    }
    load(&location.path)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unable to determine config path (set --config or RESEARCH_UI_CONFIG)")]
    NoHome,
}

use std::path::{Path, PathBuf};

use super::types::{AppConfig, DecisionProvider};
use crate::error::ConfigError;

pub const LOCAL_CONFIG_FILE: &str = "finguard.toml";
pub const ENV_PERMIT_KEY: &str = "PERMIT_KEY";
pub const ENV_PDP_URL: &str = "PDP_URL";

/// `./finguard.toml`, then `~/.finguard/config.toml`, then built-in defaults.
/// Environment overrides are applied last.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let mut cfg = match default_config_path() {
        Some(path) => read_config(&path)?,
        None => AppConfig::default(),
    };
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}

/// Loads an explicit file; a missing file is an error here.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let mut cfg = read_config(path)?;
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    let home = dirs::home_dir()?.join(".finguard").join("config.toml");
    home.exists().then_some(home)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn apply_env_overrides(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

    if let DecisionProvider::Permit(ref mut permit) = cfg.decision.provider {
        if let Some(v) = get(ENV_PERMIT_KEY) {
            permit.api_key = v;
        }
        if let Some(v) = get(ENV_PDP_URL) {
            permit.pdp_url = v;
        }
    }
    if cfg.admin.api_key.trim().is_empty() {
        if let Some(v) = get(ENV_PERMIT_KEY) {
            cfg.admin.api_key = v;
        }
    }
}

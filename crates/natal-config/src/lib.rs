use anyhow::Context;
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_EPHEMERIS_PATH: &str = ".";

/// Relative locations tried for the config file when `NATAL_CONFIG` is unset.
const CONFIG_PATHS: [&str; 2] = ["configs/natal.toml", "../../configs/natal.toml"];

/// Process configuration, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct NatalConfig {
    /// Directory holding the Swiss Ephemeris data files
    pub ephemeris_path: PathBuf,
    /// Shared secret for `/natal`; None disables authorization
    pub api_key: Option<String>,
    pub bind_address: String,
}

impl Default for NatalConfig {
    fn default() -> Self {
        Self {
            ephemeris_path: PathBuf::from(DEFAULT_EPHEMERIS_PATH),
            api_key: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NatalConfigToml {
    #[serde(default)]
    ephemeris_path: Option<PathBuf>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    bind_address: Option<String>,
}

impl NatalConfig {
    /// Layer file values, then overrides, over the defaults.
    ///
    /// `lookup` resolves an override variable by name.
    pub fn from_sources<F>(toml_text: Option<&str>, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: NatalConfigToml = match toml_text {
            Some(text) => toml::from_str(text).context("Failed to parse natal config")?,
            None => NatalConfigToml::default(),
        };

        let defaults = NatalConfig::default();
        let ephemeris_path = lookup("EPHE_PATH")
            .map(PathBuf::from)
            .or(file.ephemeris_path)
            .unwrap_or(defaults.ephemeris_path);
        let api_key = non_blank(lookup("API_KEY")).or_else(|| non_blank(file.api_key));
        let bind_address = lookup("NATAL_BIND_ADDRESS")
            .or(file.bind_address)
            .unwrap_or(defaults.bind_address);

        Ok(Self {
            ephemeris_path,
            api_key,
            bind_address,
        })
    }

    pub fn auth_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Load configuration from the optional TOML file and the process environment.
pub fn load_config() -> anyhow::Result<NatalConfig> {
    let text = read_config_text()?;
    NatalConfig::from_sources(text.as_deref(), |key| env::var(key).ok())
}

/// `NATAL_CONFIG` must point at a readable file; otherwise the usual
/// relative paths are tried and a missing file is not an error.
fn read_config_text() -> anyhow::Result<Option<String>> {
    if let Ok(explicit) = env::var("NATAL_CONFIG") {
        let text = fs::read_to_string(&explicit)
            .with_context(|| format!("Could not read NATAL_CONFIG file {}", explicit))?;
        debug!("Loaded config from {}", explicit);
        return Ok(Some(text));
    }
    for p in &CONFIG_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            debug!("Loaded config from {}", p);
            return Ok(Some(text));
        }
    }
    Ok(None)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

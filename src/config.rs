// Configuration assembled once at startup and passed down by reference.
//
// Sources, later ones win: built-in defaults, `<config_dir>/yt/config.toml`,
// an explicit `--config` file, then `YOUTRACK_*` environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the YouTrack instance, e.g. `https://acme.youtrack.cloud`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub api_endpoint: Option<String>,
    /// Permanent token sent as a bearer token.
    #[serde(default, deserialize_with = "lenient_string")]
    pub token: Option<String>,
    /// Login used to filter `yt list` down to the user's own issues.
    #[serde(default, deserialize_with = "lenient_string")]
    pub user: Option<String>,
    /// Tracked durations shorter than this are raised to it.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub min_duration_in_sec: u64,
    #[serde(default)]
    pub debug: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_endpoint", &self.api_endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("min_duration_in_sec", &self.min_duration_in_sec)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Config {
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("YOUTRACK_")).extract()
    }
}

fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("yt"))
}

/// The env provider parses `YOUTRACK_USER=12345` as a number; text
/// settings take it back as the string the user typed.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Accepts integers and numeric strings; anything else becomes 0 instead
/// of failing the whole configuration.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = match &raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Null => Some(0),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        tracing::warn!(value = %raw, "invalid minimum duration, using 0");
        0
    }))
}

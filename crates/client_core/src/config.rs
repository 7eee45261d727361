use std::{fs, io::ErrorKind, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::domain::Item;
use tracing::warn;
use url::Url;

use crate::image::PayloadEncoding;

pub const DEFAULT_SETTINGS_FILE: &str = "cart.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint_url: String,
    pub payload_encoding: PayloadEncoding,
    /// Items the list starts with.
    pub seed_items: Vec<Item>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:8000/".into(),
            payload_encoding: PayloadEncoding::Raw,
            seed_items: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoint_url: Option<String>,
    payload_encoding: Option<PayloadEncoding>,
    seed_items: Option<Vec<Item>>,
}

impl Settings {
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.endpoint_url.trim())
            .with_context(|| format!("invalid endpoint url '{}'", self.endpoint_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("endpoint url '{url}' must use http or https");
        }
        Ok(url)
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
        let mut settings = Self::default();
        if let Some(v) = file_cfg.endpoint_url {
            settings.endpoint_url = v;
        }
        if let Some(v) = file_cfg.payload_encoding {
            settings.payload_encoding = v;
        }
        if let Some(v) = file_cfg.seed_items {
            settings.seed_items = v;
        }
        Ok(settings)
    }
}

/// Applies `CART_*` and `APP__*` overrides; the `APP__` form wins.
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in ["CART_ENDPOINT_URL", "APP__ENDPOINT_URL"] {
        if let Some(v) = lookup(key) {
            settings.endpoint_url = v;
        }
    }

    for key in ["CART_PAYLOAD_ENCODING", "APP__PAYLOAD_ENCODING"] {
        if let Some(v) = lookup(key) {
            match v.parse() {
                Ok(encoding) => settings.payload_encoding = encoding,
                Err(err) => warn!(key, error = %err, "config: ignoring payload encoding override"),
            }
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE))
}

/// Defaults, then `path` if it exists and parses, then the environment.
pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => Settings::from_toml(&raw).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %format!("{err:#}"), "config: using defaults");
            Settings::default()
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config: unreadable settings file, using defaults");
            Settings::default()
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::Result;

fn default_locale() -> String {
    String::from("en")
}
fn default_log() -> String {
    String::from("info")
}

/// Settings for the inspector and for loading translations.
///
/// Read from an optional `enumerize.toml` (or whatever path is given) and
/// then from `ENUMERIZE_*` environment variables, which take precedence.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub translations: Option<PathBuf>,
    #[serde(default)]
    pub declarations: Option<PathBuf>,
    #[serde(default = "default_log")]
    pub log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            translations: None,
            declarations: None,
            log: default_log(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        Ok(Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("ENUMERIZE"))
            .build()?
            .try_deserialize::<Self>()?)
    }
}

//! Label translations.
//!
//! Translations are read through the `config` crate, so any format it knows
//! (TOML, JSON, YAML, ...) works. The file is keyed by locale first, mirroring
//! the usual locale file layout:
//!
//! ```toml
//! [en.enumerize.user.sex]
//! male = "Gentleman"
//! female = "Lady"
//!
//! [en.enumerize.defaults.status]
//! active = "Active account"
//! ```

use std::path::Path;

use config::{Config, File, FileFormat};
use serde_json::Value as Tree;
use tracing::debug;

use crate::Result;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Translations {
    locale: String,
    tree: Tree,
}

impl Translations {
    pub fn from_file<P: AsRef<Path>>(path: P, locale: &str) -> Result<Self> {
        let tree = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize::<Tree>()?;
        debug!(path = %path.as_ref().display(), locale, "translations loaded");
        Ok(Self {
            locale: locale.to_owned(),
            tree,
        })
    }
    pub fn from_str(source: &str, format: FileFormat, locale: &str) -> Result<Self> {
        let tree = Config::builder()
            .add_source(File::from_str(source, format))
            .build()?
            .try_deserialize::<Tree>()?;
        Ok(Self {
            locale: locale.to_owned(),
            tree,
        })
    }
    /// Loads the translations file named in the settings, if there is one.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        match &settings.translations {
            Some(path) => Self::from_file(path, &settings.locale).map(Some),
            None => Ok(None),
        }
    }
    pub fn locale(&self) -> &str {
        &self.locale
    }
    /// Looks up a dotted key below the current locale.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut node = self.tree.get(&self.locale)?;
        for segment in key.split('.') {
            node = node.get(segment)?;
        }
        node.as_str().map(str::to_owned)
    }
}

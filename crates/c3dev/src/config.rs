//! Names and settings of the files making up a game's assets.
//!
//! A config is a small TOML document. Every table is optional and falls back
//! to the file names shipped with Catacomb 3-D:
//!
//! ```toml
//! maps = "GAMEMAPS.C3D"
//!
//! [graphics]
//! directory = "EGAHEAD.C3D"
//! dictionary = "EGADICT.C3D"
//! data = "EGAGRAPH.C3D"
//! bit_order = "lsb-first"
//!
//! [audio]
//! directory = "AUDIOHEAD.C3D"
//! dictionary = "AUDIODICT.C3D"
//! data = "AUDIO.C3D"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    assets::{AssetDomain, AssetStore, LoadError},
    compression::bits::BitOrder,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The three files backing one chunked asset domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFiles {
    pub directory: PathBuf,
    pub dictionary: PathBuf,
    pub data: PathBuf,
}

impl AssetFiles {
    /// Joins relative paths onto `root`. Absolute paths are kept as-is.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> AssetFiles {
        AssetFiles {
            directory: root.join(&self.directory),
            dictionary: root.join(&self.dictionary),
            data: root.join(&self.data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    directory: PathBuf,
    dictionary: PathBuf,
    data: PathBuf,
    #[serde(default)]
    bit_order: BitOrder,
}

impl DomainConfig {
    fn with_names(directory: &str, dictionary: &str, data: &str) -> Self {
        Self {
            directory: directory.into(),
            dictionary: dictionary.into(),
            data: data.into(),
            bit_order: BitOrder::default(),
        }
    }

    #[must_use]
    pub fn files(&self) -> AssetFiles {
        AssetFiles {
            directory: self.directory.clone(),
            dictionary: self.dictionary.clone(),
            data: self.data.clone(),
        }
    }

    #[must_use]
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }
}

fn default_graphics() -> DomainConfig {
    DomainConfig::with_names("EGAHEAD.C3D", "EGADICT.C3D", "EGAGRAPH.C3D")
}

fn default_audio() -> DomainConfig {
    DomainConfig::with_names("AUDIOHEAD.C3D", "AUDIODICT.C3D", "AUDIO.C3D")
}

fn default_maps() -> PathBuf {
    "GAMEMAPS.C3D".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    #[serde(default = "default_graphics")]
    graphics: DomainConfig,
    #[serde(default = "default_audio")]
    audio: DomainConfig,
    #[serde(default = "default_maps")]
    maps: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            graphics: default_graphics(),
            audio: default_audio(),
            maps: default_maps(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn domain(&self, domain: AssetDomain) -> &DomainConfig {
        match domain {
            AssetDomain::Graphics => &self.graphics,
            AssetDomain::Audio => &self.audio,
        }
    }

    /// Path of the map container, relative to the game root unless absolute.
    #[must_use]
    pub fn maps(&self) -> &Path {
        &self.maps
    }

    /// Loads the store for `domain` from the game directory `root`.
    pub fn open_store(&self, root: &Path, domain: AssetDomain) -> Result<AssetStore, LoadError> {
        let domain_config = self.domain(domain);
        AssetStore::open(
            domain.directory_format(),
            domain_config.bit_order(),
            &domain_config.files().resolve(root),
        )
    }
}

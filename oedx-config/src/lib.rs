//! Shared configuration loader for the oedx toolchain.
//!
//! `defaults/oedx.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`OedxConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use oedx_babel::settings::{
    ArchiveSettings, ImageSettings, MarkdownSettings, PackageSettings, Settings, XmlSettings,
};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/oedx.default.toml");

/// Top-level configuration consumed by oedx applications.
#[derive(Debug, Clone, Deserialize)]
pub struct OedxConfig {
    pub package: PackageConfig,
    pub xml: XmlConfig,
    pub markdown: MarkdownConfig,
    pub images: ImagesConfig,
    pub archive: ArchiveConfig,
    pub index: IndexConfig,
}

/// Identity of generated packages.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    pub org: String,
    pub url_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XmlConfig {
    pub indent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub hard_breaks: bool,
}

/// CDN image relocation during `oedx2md`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    pub cdn_domain: String,
    pub storage_base_url: String,
    pub key_prefix: String,
    pub upload: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    pub file_name: String,
    pub root_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    pub file_name: String,
}

impl From<&OedxConfig> for Settings {
    fn from(config: &OedxConfig) -> Self {
        Settings {
            package: PackageSettings {
                org: config.package.org.clone(),
                url_prefix: config.package.url_prefix.clone(),
            },
            xml: XmlSettings {
                indent: config.xml.indent.clone(),
            },
            markdown: MarkdownSettings {
                hard_breaks: config.markdown.hard_breaks,
            },
            images: ImageSettings {
                cdn_domain: config.images.cdn_domain.clone(),
                storage_base_url: config.images.storage_base_url.clone(),
                key_prefix: config.images.key_prefix.clone(),
            },
            archive: ArchiveSettings {
                file_name: config.archive.file_name.clone(),
                root_dir: config.archive.root_dir.clone(),
            },
            index_file_name: config.index.file_name.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<OedxConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<OedxConfig, ConfigError> {
    Loader::new().build()
}

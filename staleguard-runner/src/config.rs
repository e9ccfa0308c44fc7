// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for staleguard.

use crate::errors::{ConfigParseError, ConfigParseErrorKind, WorkingDirError};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::sync::Arc;

/// Overall configuration for staleguard.
///
/// Repository-specific configuration is layered on top of the default config
/// embedded at build time.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StaleguardConfig {
    /// Settings for where and how records are stored.
    pub cache: CacheConfig,

    /// Settings for how verdicts propagate between tests.
    pub run: RunConfig,
}

/// The `[cache]` section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CacheConfig {
    /// The directory created next to each feature file to hold records.
    ///
    /// Must be a single normal path component.
    pub dir_name: String,

    /// What to do with recorded source files that no longer exist.
    pub missing_files: MissingFilePolicy,
}

/// The `[run]` section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunConfig {
    /// Whether a test that must run forces its dependencies to report that they
    /// must run too.
    pub force_dependencies: bool,
}

/// How a recorded source file that has since disappeared affects the verdict.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MissingFilePolicy {
    /// The file counts as changed, so the test executes again.
    Dirty,

    /// The verdict fails with an error.
    Error,
}

impl StaleguardConfig {
    /// The default location of the config within the workspace root.
    pub const CONFIG_PATH: &'static str = ".config/staleguard.toml";

    /// Contains the default config as a TOML file.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Returns the default config without reading any files.
    pub fn default_config() -> Self {
        Self::build_and_deserialize_config(&Self::make_default_config())
            .expect("default config is always valid")
    }

    /// Reads the config from the given file, or if not specified from
    /// `.config/staleguard.toml` in the workspace root.
    ///
    /// An explicitly specified file must exist. If no file is specified and the
    /// workspace has no config, the default config is used.
    pub fn from_sources(
        workspace_root: &Utf8Path,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = workspace_root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(config_file, kind))
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let config: Self = serde_path_to_error::deserialize(config)
            .map_err(|error| ConfigParseErrorKind::DeserializeError(Box::new(error)))?;
        config.cache.validate()?;
        Ok(config)
    }
}

impl CacheConfig {
    fn validate(&self) -> Result<(), ConfigParseErrorKind> {
        let mut components = Utf8Path::new(&self.dir_name).components();
        match (components.next(), components.next()) {
            (Some(Utf8Component::Normal(name)), None) if name == self.dir_name => Ok(()),
            _ => Err(ConfigParseErrorKind::InvalidCacheDirName {
                dir_name: self.dir_name.clone(),
            }),
        }
    }
}

/// Everything the caches need to know about the current run.
///
/// Combines a [`StaleguardConfig`] with the working directory that recorded
/// paths are relative to. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CacheSettings {
    inner: Arc<CacheSettingsInner>,
}

#[derive(Debug)]
struct CacheSettingsInner {
    working_dir: Utf8PathBuf,
    config: StaleguardConfig,
}

impl CacheSettings {
    /// Creates settings for a run in `working_dir`.
    ///
    /// `working_dir` should be absolute; recorded paths are stored relative to it.
    pub fn new(config: StaleguardConfig, working_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            inner: Arc::new(CacheSettingsInner {
                working_dir: working_dir.into(),
                config,
            }),
        }
    }

    /// Creates settings for a run in the process's current directory.
    pub fn from_current_dir(config: StaleguardConfig) -> Result<Self, WorkingDirError> {
        let current_dir = std::env::current_dir().map_err(WorkingDirError::CurrentDir)?;
        let working_dir =
            Utf8PathBuf::from_path_buf(current_dir).map_err(WorkingDirError::NotUtf8)?;
        Ok(Self::new(config, working_dir))
    }

    /// The directory recorded paths are relative to.
    pub fn working_dir(&self) -> &Utf8Path {
        &self.inner.working_dir
    }

    /// The config these settings were created from.
    pub fn config(&self) -> &StaleguardConfig {
        &self.inner.config
    }

    /// The name of the per-directory cache directory.
    pub fn cache_dir_name(&self) -> &str {
        &self.inner.config.cache.dir_name
    }

    /// The policy for recorded files that have disappeared.
    pub fn missing_files(&self) -> MissingFilePolicy {
        self.inner.config.cache.missing_files
    }

    /// Whether dependencies of a test that must run are forced to run.
    pub fn force_dependencies(&self) -> bool {
        self.inner.config.run.force_dependencies
    }
}

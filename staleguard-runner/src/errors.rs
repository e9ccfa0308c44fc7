// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by staleguard.

use camino::Utf8PathBuf;
use config::ConfigError;
use staleguard_metadata::{StaleguardExitCode, TestLocation};
use std::{error, io};
use thiserror::Error;

/// An error that occurred while parsing the staleguard config.
#[derive(Debug, Error)]
#[error("failed to parse staleguard config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }

    /// Returns the exit code a host should use for this error.
    pub fn process_exit_code(&self) -> i32 {
        StaleguardExitCode::CONFIG_ERROR
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),

    /// The cache directory name is not a single path component.
    #[error(
        "invalid `cache.dir-name` value `{dir_name}`: \
         must be a single directory name, without separators or `.`/`..`"
    )]
    InvalidCacheDirName {
        /// The configured value.
        dir_name: String,
    },
}

/// An error that occurred while determining the working directory of a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkingDirError {
    /// The current directory could not be read.
    #[error("failed to read the current directory")]
    CurrentDir(#[source] io::Error),

    /// The current directory is not valid UTF-8.
    #[error("current directory is not valid UTF-8: {}", .0.display())]
    NotUtf8(std::path::PathBuf),
}

/// An error that occurred while reading or writing a cache record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    /// The test location has no file name to key a record on.
    #[error("cannot derive a cache location for `{location}`: the file has no file name")]
    InvalidLocation {
        /// The offending location.
        location: TestLocation,
    },

    /// The directory holding a record could not be created.
    #[error("failed to create cache directory `{path}`")]
    CreateDir {
        /// The directory that failed to be created.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// A record could not be read.
    #[error("failed to read cache record `{path}`")]
    Read {
        /// The record that failed to be read.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// A record could not be written.
    #[error("failed to write cache record `{path}`")]
    Write {
        /// The record that failed to be written.
        path: Utf8PathBuf,

        /// The underlying error, either from the atomic rename or from the writer.
        #[source]
        error: atomicwrites::Error<io::Error>,
    },

    /// The modification time of a record could not be determined.
    #[error("failed to read modification time of cache record `{path}`")]
    Metadata {
        /// The record whose metadata could not be read.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },
}

/// An error that occurred while deciding whether a test should execute.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerdictError {
    /// A cache record could not be read.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A recorded source file no longer exists.
    ///
    /// Only produced when the missing-files policy is `error`.
    #[error("source file `{path}` recorded for `{location}` no longer exists")]
    MissingSourceFile {
        /// The test whose record lists the file.
        location: TestLocation,

        /// The path as resolved against the working directory.
        path: Utf8PathBuf,
    },

    /// The modification time of a recorded source file could not be read.
    #[error("failed to read modification time of source file `{path}`")]
    SourceMetadata {
        /// The path as resolved against the working directory.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },
}

/// An error reported by a coverage collector.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoverageError {
    /// The collector could not start observing execution.
    #[error("failed to start coverage collection")]
    Start(#[source] Box<dyn error::Error + Send + Sync>),

    /// The collector could not report the files it observed.
    #[error("failed to stop coverage collection")]
    Stop(#[source] Box<dyn error::Error + Send + Sync>),
}

/// An error that occurs when an operation needs a current test but none exists.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// An ambient operation was requested before any test was started.
    ///
    /// This indicates a bug in the host integration, not a runtime condition.
    #[error("`{operation}` was called before any test was started in this session")]
    NoCurrentTest {
        /// The operation that was attempted.
        operation: &'static str,
    },
}

/// An error that occurred while watching a test execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A cache record could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The skip/run verdict could not be determined.
    #[error(transparent)]
    Verdict(#[from] VerdictError),

    /// The coverage collector failed.
    #[error(transparent)]
    Coverage(#[from] CoverageError),

    /// No test has been started yet.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl EngineError {
    /// Returns the exit code a host should use for this error.
    ///
    /// Collector failures and host integration bugs aren't documented
    /// conditions, so they map to 1.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::Cache(_) | Self::Verdict(_) => StaleguardExitCode::CACHE_ERROR,
            Self::Coverage(_) | Self::Session(_) => 1,
        }
    }
}

/// An error that occurred while initializing logging.
#[derive(Debug, Error)]
#[error("unable to parse STALEGUARD_LOG value `{value}`")]
#[non_exhaustive]
pub struct LogInitError {
    /// The value of the environment variable.
    pub value: String,

    /// The underlying parse error.
    #[source]
    pub error: tracing_subscriber::filter::ParseError,
}

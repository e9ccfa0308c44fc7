// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    config::{CacheSettings, StaleguardConfig},
    coverage::CoverageCollector,
    errors::CoverageError,
};
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use std::{fs, time::SystemTime};

/// Default settings rooted at `temp_dir`.
pub(crate) fn settings_in(temp_dir: &Utf8TempDir) -> CacheSettings {
    CacheSettings::new(StaleguardConfig::default_config(), temp_dir.path())
}

/// Sets the modification time of `path`.
pub(crate) fn set_mtime(path: &Utf8Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(time))
        .unwrap_or_else(|err| panic!("setting mtime of {path} failed: {err}"));
}

/// A coverage collector that reports a fixed list of files on every stop.
#[derive(Debug, Default)]
pub(crate) struct FixedCoverage {
    pub(crate) files: Vec<Utf8PathBuf>,
    pub(crate) started: usize,
    pub(crate) stopped: usize,
}

impl FixedCoverage {
    pub(crate) fn new(files: impl IntoIterator<Item = impl Into<Utf8PathBuf>>) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

impl CoverageCollector for FixedCoverage {
    fn start(&mut self) -> Result<(), CoverageError> {
        self.started += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<Utf8PathBuf>, CoverageError> {
        self.stopped += 1;
        Ok(self.files.clone())
    }
}


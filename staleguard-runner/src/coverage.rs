// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording which source files a test execution touches.
//!
//! Instrumentation itself is delegated to a [`CoverageCollector`]. A
//! [`CoverageRecording`] brackets one execution with the collector, merges in
//! whatever it reports, and accepts files recorded explicitly by hooks.

use crate::{
    cache::SourceFileCache,
    errors::{CacheError, CoverageError},
    helpers::{plural, relativize},
};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use tracing::debug;

/// Observes code execution and reports the source files that were executed.
pub trait CoverageCollector {
    /// Begins observing execution.
    fn start(&mut self) -> Result<(), CoverageError>;

    /// Stops observing execution and returns every file analyzed since
    /// [`start`](Self::start).
    fn stop(&mut self) -> Result<Vec<Utf8PathBuf>, CoverageError>;
}

/// A collector that observes nothing.
///
/// With this collector, only the test's own file and files recorded through
/// hooks are cached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCoverage;

impl CoverageCollector for NoCoverage {
    fn start(&mut self) -> Result<(), CoverageError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<Utf8PathBuf>, CoverageError> {
        Ok(Vec::new())
    }
}

/// The files touched during one test execution.
#[derive(Clone, Debug, Default)]
pub struct CoverageRecording {
    touched: IndexSet<Utf8PathBuf>,
}

impl CoverageRecording {
    /// Creates an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the touched set.
    ///
    /// Paths are de-duplicated by exact match; no normalization happens until
    /// [`save`](Self::save).
    pub fn record_file(&mut self, path: impl Into<Utf8PathBuf>) {
        self.touched.insert(path.into());
    }

    /// Runs `block` with `collector` active for its whole duration, then merges
    /// every file the collector reports into the touched set.
    ///
    /// `block` is handed this recording so that it can record files itself.
    pub fn record_coverage<T, F>(
        &mut self,
        collector: &mut dyn CoverageCollector,
        block: F,
    ) -> Result<T, CoverageError>
    where
        F: FnOnce(&mut Self) -> T,
    {
        collector.start()?;
        let value = block(self);
        let analyzed = collector.stop()?;
        debug!(
            "coverage collector reported {} {}",
            analyzed.len(),
            plural::files_str(analyzed.len())
        );
        self.touched.extend(analyzed);
        Ok(value)
    }

    /// The touched files, in the order they were first recorded.
    pub fn touched(&self) -> impl ExactSizeIterator<Item = &Utf8Path> {
        self.touched.iter().map(|path| path.as_path())
    }

    /// Returns the touched files relative to `working_dir`, de-duplicated after
    /// normalization.
    pub fn normalized(&self, working_dir: &Utf8Path) -> Vec<Utf8PathBuf> {
        let normalized: IndexSet<_> = self
            .touched
            .iter()
            .map(|path| relativize(path, working_dir))
            .collect();
        normalized.into_iter().collect()
    }

    /// Writes the normalized touched files to `cache`.
    pub fn save(&self, cache: &SourceFileCache, working_dir: &Utf8Path) -> Result<(), CacheError> {
        cache.save(self.normalized(working_dir))
    }
}

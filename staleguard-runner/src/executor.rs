// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The skip/run decision for a single test.

use crate::{
    cache::{Cache, SourceFileCache, StatusCache},
    config::CacheSettings,
    errors::{CacheError, VerdictError},
    identifier::TestIdentifier,
};
use staleguard_metadata::TestLocation;
use std::collections::BTreeSet;
use tracing::debug;

/// Decides whether a test needs to execute.
///
/// A test executes if any of the following hold, checked in this order:
///
/// 1. it was forced to by the session (a test depending on it executes);
///    forcing applies to every link of a dependency chain, so a test whose
///    dependency is forced must execute too;
/// 2. it has no record of touched files, or one of them changed;
/// 3. it failed the last time it ran;
/// 4. the test it depends on needs to execute, recursively.
#[derive(Clone, Debug)]
pub struct Executor {
    identifier: TestIdentifier,
    settings: CacheSettings,
    source_files: SourceFileCache,
    status: StatusCache,
    forced: BTreeSet<TestLocation>,
}

impl Executor {
    /// Creates an executor for `identifier`.
    pub fn new(identifier: TestIdentifier, settings: &CacheSettings) -> Result<Self, CacheError> {
        let source_files = SourceFileCache::new(settings, identifier.location())?;
        let status = StatusCache::new(settings, identifier.location())?;
        Ok(Self {
            identifier,
            settings: settings.clone(),
            source_files,
            status,
            forced: BTreeSet::new(),
        })
    }

    /// Marks the test as having to execute regardless of its records.
    pub fn force(&mut self) {
        self.forced.insert(self.identifier.location().clone());
    }

    /// Marks every test at `locations` as having to execute. This covers both
    /// the test itself and any test in its dependency chain.
    pub fn force_locations<'a>(&mut self, locations: impl IntoIterator<Item = &'a TestLocation>) {
        self.forced.extend(locations.into_iter().cloned());
    }

    /// Returns true if the test has been forced to execute.
    pub fn is_forced(&self) -> bool {
        self.forced.contains(self.identifier.location())
    }

    /// Returns true if the test needs to execute.
    pub fn should_execute(&self) -> Result<bool, VerdictError> {
        if self.is_forced() {
            debug!(test = %self.identifier, "must execute: forced by a dependent test");
            return Ok(true);
        }
        if self.dirty()? {
            return Ok(true);
        }
        if self.failed_on_last_run()? {
            return Ok(true);
        }
        self.dependency_should_execute()
    }

    /// Returns true if no touched-files record exists, or any recorded file changed.
    pub fn dirty(&self) -> Result<bool, VerdictError> {
        if !self.source_files.exists() {
            debug!(test = %self.identifier, "must execute: no record of touched files");
            return Ok(true);
        }
        let dirty = self.source_files.any_dirty_files()?;
        if dirty {
            debug!(test = %self.identifier, "must execute: touched files changed");
        }
        Ok(dirty)
    }

    /// Returns true if the last recorded run failed.
    pub fn failed_on_last_run(&self) -> Result<bool, CacheError> {
        if !self.status.exists() {
            return Ok(false);
        }
        let failed = self
            .status
            .last_run_status()?
            .is_some_and(|status| status.is_failed());
        if failed {
            debug!(test = %self.identifier, "must execute: failed on last run");
        }
        Ok(failed)
    }

    /// Returns true if the test this one depends on needs to execute.
    pub fn dependency_should_execute(&self) -> Result<bool, VerdictError> {
        let Some(dependency) = self.identifier.depends_on() else {
            return Ok(false);
        };

        let mut executor = Executor::new(dependency.clone(), &self.settings)?;
        executor.forced.clone_from(&self.forced);
        let should_execute = executor.should_execute()?;
        if should_execute {
            debug!(
                test = %self.identifier,
                %dependency,
                "must execute: dependency must execute"
            );
        }
        Ok(should_execute)
    }
}

// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration of a single test execution.

use crate::{
    cache::{SourceFileCache, StatusCache},
    config::CacheSettings,
    coverage::{CoverageCollector, CoverageRecording},
    errors::{CacheError, EngineError, VerdictError},
    executor::Executor,
    identifier::TestIdentifier,
};
use camino::{Utf8Path, Utf8PathBuf};
use staleguard_metadata::{RunStatus, TestLocation};
use tracing::debug;

/// The host's reporting surface.
pub trait Visitor {
    /// Called when a test is about to run even though its records say it
    /// doesn't need to.
    ///
    /// This is advisory: the test still executes, and it's up to the host to
    /// act on the announcement (e.g. by suppressing output).
    fn announce_skip(&mut self, test: &TestIdentifier);
}

impl<F> Visitor for F
where
    F: FnMut(&TestIdentifier),
{
    fn announce_skip(&mut self, test: &TestIdentifier) {
        self(test)
    }
}

/// A visitor that logs skip announcements and otherwise does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogVisitor;

impl Visitor for LogVisitor {
    fn announce_skip(&mut self, test: &TestIdentifier) {
        tracing::info!(%test, "skippable: nothing relevant changed since the last passing run");
    }
}

/// What happened during one watched execution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TestOutcome {
    /// Whether the test was determined to need execution before it ran.
    pub should_execute: bool,

    /// The status recorded for this execution.
    pub status: RunStatus,
}

/// Watches one execution of a test: decides whether it was needed, records what
/// it touches, and persists the results.
#[derive(Debug)]
pub struct TestMonitor {
    identifier: TestIdentifier,
    working_dir: Utf8PathBuf,
    recording: CoverageRecording,
    source_files: SourceFileCache,
    status: StatusCache,
    executor: Executor,
    failed: bool,
    verdict: Option<bool>,
}

impl TestMonitor {
    /// Creates a monitor for `identifier`. Nothing is read until the verdict is
    /// requested.
    pub fn new(identifier: TestIdentifier, settings: &CacheSettings) -> Result<Self, CacheError> {
        let source_files = SourceFileCache::new(settings, identifier.location())?;
        let status = StatusCache::new(settings, identifier.location())?;
        let executor = Executor::new(identifier.clone(), settings)?;
        Ok(Self {
            identifier,
            working_dir: settings.working_dir().to_owned(),
            recording: CoverageRecording::new(),
            source_files,
            status,
            executor,
            failed: false,
            verdict: None,
        })
    }

    /// The test being watched.
    pub fn identifier(&self) -> &TestIdentifier {
        &self.identifier
    }

    /// Records a file as touched by this test.
    pub fn record(&mut self, path: &Utf8Path) {
        self.recording.record_file(path);
    }

    /// Marks this test as failed. Execution is not interrupted.
    pub fn fail(&mut self) {
        self.failed = true;
    }

    /// Returns true if [`fail`](Self::fail) has been called.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Forces this test to execute regardless of its records.
    ///
    /// Has no effect once the verdict has been computed.
    pub fn force(&mut self) {
        self.executor.force();
    }

    /// Forces every test at `locations` to execute, including this one or any
    /// test it depends on.
    ///
    /// Has no effect once the verdict has been computed.
    pub fn force_locations<'a>(&mut self, locations: impl IntoIterator<Item = &'a TestLocation>) {
        self.executor.force_locations(locations);
    }

    /// Returns true if this test needs to execute.
    ///
    /// The verdict is computed once, from the records as they were before this
    /// execution refreshed them.
    pub fn should_execute(&mut self) -> Result<bool, VerdictError> {
        if let Some(verdict) = self.verdict {
            return Ok(verdict);
        }
        let verdict = self.executor.should_execute()?;
        self.verdict = Some(verdict);
        Ok(verdict)
    }

    /// Runs `block` as this test's execution.
    ///
    /// If the test doesn't need to execute, `visitor` is told so first, but
    /// `block` runs regardless so that the records stay accurate. The test's
    /// own file is always recorded. Afterwards, the touched files and the status
    /// are written.
    ///
    /// If `block` panics, the previous records are left in place.
    pub fn watch<T, F>(
        &mut self,
        visitor: &mut dyn Visitor,
        collector: &mut dyn CoverageCollector,
        block: F,
    ) -> Result<(T, TestOutcome), EngineError>
    where
        F: FnOnce(&mut TestScope<'_>) -> T,
    {
        let should_execute = self.should_execute()?;
        if !should_execute {
            visitor.announce_skip(&self.identifier);
        }

        self.recording.record_file(self.identifier.file());

        let Self {
            recording, failed, ..
        } = self;
        let value = recording.record_coverage(collector, |recording| {
            block(&mut TestScope { recording, failed })
        })?;

        self.recording.save(&self.source_files, &self.working_dir)?;
        let status = if self.failed {
            RunStatus::Failed
        } else {
            RunStatus::Passed
        };
        self.status.record(status)?;

        debug!(
            test = %self.identifier,
            %status,
            should_execute,
            "recorded test execution"
        );
        Ok((
            value,
            TestOutcome {
                should_execute,
                status,
            },
        ))
    }
}

/// The handle a test body uses to report to its monitor while it executes.
///
/// This is threaded through the host's execution call chain instead of living
/// in a global.
#[derive(Debug)]
pub struct TestScope<'a> {
    recording: &'a mut CoverageRecording,
    failed: &'a mut bool,
}

impl TestScope<'_> {
    /// Records a file as touched by the current test.
    pub fn record(&mut self, path: &Utf8Path) {
        self.recording.record_file(path);
    }

    /// Marks the current test as failed. Execution is not interrupted.
    pub fn fail(&mut self) {
        *self.failed = true;
    }
}

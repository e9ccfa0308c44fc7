// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The context object a host threads through a test run.

use crate::{
    config::CacheSettings,
    coverage::CoverageCollector,
    errors::{EngineError, SessionError},
    helpers::plural,
    identifier::TestIdentifier,
    monitor::{TestMonitor, TestOutcome, TestScope, Visitor},
    summary::RunSummary,
};
use camino::Utf8Path;
use debug_ignore::DebugIgnore;
use staleguard_metadata::TestLocation;
use std::collections::BTreeSet;
use tracing::debug;

/// Ambient operations available to hooks that run as part of a test.
///
/// Implemented by [`TestScope`], which is handed to a test body while it
/// executes, and by [`Session`], which forwards to the most recently started
/// test.
pub trait TestContext {
    /// Records `path` as touched by the current test.
    fn record(&mut self, path: &Utf8Path) -> Result<(), SessionError>;

    /// Marks the current test as failed. Execution is not interrupted.
    fn fail_current_test(&mut self) -> Result<(), SessionError>;
}

impl TestContext for TestScope<'_> {
    fn record(&mut self, path: &Utf8Path) -> Result<(), SessionError> {
        TestScope::record(self, path);
        Ok(())
    }

    fn fail_current_test(&mut self) -> Result<(), SessionError> {
        self.fail();
        Ok(())
    }
}

/// One run of a test suite.
///
/// A session executes one test at a time. The most recently started test stays
/// current after it completes, until the next one starts.
#[derive(Debug)]
pub struct Session {
    settings: CacheSettings,
    collector: DebugIgnore<Box<dyn CoverageCollector>>,
    current: Option<TestMonitor>,
    forced: BTreeSet<TestLocation>,
    summary: RunSummary,
}

impl Session {
    /// Creates a new session.
    pub fn new(settings: CacheSettings, collector: impl CoverageCollector + 'static) -> Self {
        Self {
            settings,
            collector: DebugIgnore(Box::new(collector)),
            current: None,
            forced: BTreeSet::new(),
            summary: RunSummary::default(),
        }
    }

    /// The settings this session was created with.
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// The most recently started test, if any.
    pub fn current_test(&self) -> Option<&TestIdentifier> {
        self.current.as_ref().map(|monitor| monitor.identifier())
    }

    /// Statistics for the tests run so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Starts `identifier` and runs `block` as its execution.
    ///
    /// The verdict is computed before `block` runs. If the test must run and
    /// `run.force-dependencies` is enabled, every test in its dependency chain
    /// must also run for the rest of this session, and so must every test that
    /// depends on one of them.
    ///
    /// If the verdict can't be computed, no test is current afterwards.
    pub fn start_test<T, F>(
        &mut self,
        identifier: TestIdentifier,
        visitor: &mut dyn Visitor,
        block: F,
    ) -> Result<(T, TestOutcome), EngineError>
    where
        F: FnOnce(&mut TestScope<'_>) -> T,
    {
        // A failed start must not leave the previous test current.
        self.current = None;

        let mut monitor = TestMonitor::new(identifier, &self.settings)?;
        monitor.force_locations(&self.forced);

        let should_execute = monitor.should_execute()?;
        if should_execute && self.settings.force_dependencies() {
            let mut newly_forced = 0;
            for dependency in monitor.identifier().dependency_chain() {
                if self.forced.insert(dependency.location().clone()) {
                    newly_forced += 1;
                }
            }
            if newly_forced > 0 {
                debug!(
                    test = %monitor.identifier(),
                    "forcing {newly_forced} {} in the dependency chain",
                    plural::tests_str(newly_forced)
                );
            }
        }

        let monitor = self.current.insert(monitor);
        let (value, outcome) = monitor.watch(visitor, &mut **self.collector, block)?;
        self.summary.on_test_finished(&outcome);
        Ok((value, outcome))
    }

    /// Marks the current test as failed.
    pub fn fail_current_test(&mut self) -> Result<(), SessionError> {
        self.current_mut("fail_current_test")?.fail();
        Ok(())
    }

    /// Records `path` as touched by the current test.
    pub fn record(&mut self, path: &Utf8Path) -> Result<(), SessionError> {
        self.current_mut("record")?.record(path);
        Ok(())
    }

    /// Returns true if the current test didn't need to execute.
    ///
    /// This reports the verdict the test was started with, so it can be asked
    /// after the test completed.
    pub fn can_skip(&mut self) -> Result<bool, EngineError> {
        let Self {
            current, forced, ..
        } = self;
        let monitor = current
            .as_mut()
            .ok_or(SessionError::NoCurrentTest {
                operation: "can_skip",
            })?;
        if forced.contains(monitor.identifier().location()) {
            return Ok(false);
        }
        Ok(!monitor.should_execute()?)
    }

    fn current_mut(&mut self, operation: &'static str) -> Result<&mut TestMonitor, SessionError> {
        self.current
            .as_mut()
            .ok_or(SessionError::NoCurrentTest { operation })
    }
}

impl TestContext for Session {
    fn record(&mut self, path: &Utf8Path) -> Result<(), SessionError> {
        Session::record(self, path)
    }

    fn fail_current_test(&mut self) -> Result<(), SessionError> {
        Session::fail_current_test(self)
    }
}

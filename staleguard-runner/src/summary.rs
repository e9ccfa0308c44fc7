// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statistics accumulated over a session.

use crate::{helpers::plural, monitor::TestOutcome};
use staleguard_metadata::{RunStatus, StaleguardExitCode};
use std::fmt;

/// Statistics for a session.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct RunSummary {
    /// The number of tests that were started.
    pub started: usize,

    /// The number of tests whose records said they didn't need to execute.
    ///
    /// These tests still ran, so they are also counted in `passed` or `failed`.
    pub skippable: usize,

    /// The number of tests that passed.
    pub passed: usize,

    /// The number of tests that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Returns true if no test failed.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// The exit code a host should use for this session.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            StaleguardExitCode::OK
        } else {
            StaleguardExitCode::TEST_RUN_FAILED
        }
    }

    pub(crate) fn on_test_finished(&mut self, outcome: &TestOutcome) {
        self.started += 1;
        if !outcome.should_execute {
            self.skippable += 1;
        }
        match outcome.status {
            RunStatus::Passed => self.passed += 1,
            RunStatus::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} run: {} passed, {} failed, {} skippable",
            self.started,
            plural::tests_str(self.started),
            self.passed,
            self.failed,
            self.skippable,
        )
    }
}

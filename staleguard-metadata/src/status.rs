// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::RunStatusParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The outcome recorded for a test the last time it actually ran.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// The test ran and nothing marked it failed.
    Passed,

    /// The test was marked failed at least once while it ran.
    Failed,
}

impl RunStatus {
    /// Returns the token used to store this status on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    /// Returns true if this is [`RunStatus::Failed`].
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = RunStatusParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            other => Err(RunStatusParseError::new(other)),
        }
    }
}

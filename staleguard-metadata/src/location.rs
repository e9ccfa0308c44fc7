// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::TestLocationParseError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Where a test is defined: a file and the line within it.
///
/// Locations are the identity of a test for caching purposes. Two tests with the
/// same file and line are the same test, across processes.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TestLocation {
    file: Utf8PathBuf,
    line: u32,
}

impl TestLocation {
    /// Creates a new location.
    pub fn new(file: impl Into<Utf8PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The file the test is defined in, as given by the host.
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }

    /// The line the test is defined on.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for TestLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl FromStr for TestLocation {
    type Err = TestLocationParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // Split at the last colon so that Windows drive letters survive.
        let Some((file, line)) = input.rsplit_once(':') else {
            return Err(TestLocationParseError::MissingSeparator {
                input: input.to_owned(),
            });
        };
        if file.is_empty() {
            return Err(TestLocationParseError::EmptyFile {
                input: input.to_owned(),
            });
        }
        let line = line
            .parse()
            .map_err(|error| TestLocationParseError::InvalidLine {
                input: input.to_owned(),
                error,
            })?;

        Ok(Self::new(file, line))
    }
}

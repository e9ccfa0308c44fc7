// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{error, fmt};

/// An error that occurs while parsing a [`TestLocation`](crate::TestLocation) from a string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestLocationParseError {
    /// The input did not contain a `:` separating the file from the line.
    MissingSeparator {
        /// The input that failed to parse.
        input: String,
    },

    /// The file portion of the input was empty.
    EmptyFile {
        /// The input that failed to parse.
        input: String,
    },

    /// The line portion of the input was not a valid line number.
    InvalidLine {
        /// The input that failed to parse.
        input: String,

        /// The error produced while parsing the line number.
        error: std::num::ParseIntError,
    },
}

impl fmt::Display for TestLocationParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingSeparator { input } => {
                write!(f, "test location `{input}` is not of the form `file:line`")
            }
            Self::EmptyFile { input } => {
                write!(f, "test location `{input}` has an empty file path")
            }
            Self::InvalidLine { input, .. } => {
                write!(f, "test location `{input}` has an invalid line number")
            }
        }
    }
}

impl error::Error for TestLocationParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::MissingSeparator { .. } | Self::EmptyFile { .. } => None,
            Self::InvalidLine { error, .. } => Some(error),
        }
    }
}

/// An error that occurs while parsing a [`RunStatus`](crate::RunStatus) token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunStatusParseError {
    input: String,
}

impl RunStatusParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the token that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for RunStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unrecognized run status `{}` (known values: passed, failed)",
            self.input
        )
    }
}

impl error::Error for RunStatusParseError {}

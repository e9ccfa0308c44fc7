// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers for cached tests.

use camino::Utf8Path;
use staleguard_metadata::TestLocation;
use std::{
    fmt,
    hash::{Hash, Hasher},
    iter,
};

/// Identifies one executable test, and optionally the test it depends on.
///
/// A dependency is a structural prerequisite such as a shared fixture or a
/// background: whenever the dependency needs to execute, so does this test.
/// Dependencies form a single-parent chain. Cycles cannot be constructed since
/// identifiers are immutable and own their dependency.
///
/// Equality and hashing only consider the location.
#[derive(Clone, Debug)]
pub struct TestIdentifier {
    location: TestLocation,
    depends_on: Option<Box<TestIdentifier>>,
}

impl TestIdentifier {
    /// Creates an identifier with no dependency.
    pub fn new(location: TestLocation) -> Self {
        Self {
            location,
            depends_on: None,
        }
    }

    /// Creates an identifier that depends on `dependency`.
    pub fn with_dependency(location: TestLocation, dependency: TestIdentifier) -> Self {
        Self {
            location,
            depends_on: Some(Box::new(dependency)),
        }
    }

    /// The location this test is defined at.
    pub fn location(&self) -> &TestLocation {
        &self.location
    }

    /// The file this test is defined in.
    pub fn file(&self) -> &Utf8Path {
        self.location.file()
    }

    /// The line this test is defined on.
    pub fn line(&self) -> u32 {
        self.location.line()
    }

    /// The test this one directly depends on, if any.
    pub fn depends_on(&self) -> Option<&TestIdentifier> {
        self.depends_on.as_deref()
    }

    /// Iterates over all transitive dependencies, nearest first.
    pub fn dependency_chain(&self) -> impl Iterator<Item = &TestIdentifier> {
        iter::successors(self.depends_on(), |id| id.depends_on())
    }
}

impl PartialEq for TestIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for TestIdentifier {}

impl Hash for TestIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state);
    }
}

impl fmt::Display for TestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.location.fmt(f)
    }
}

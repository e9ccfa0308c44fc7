// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters between a host test framework's constructs and the engine.
//!
//! A host wraps each of its constructs in one of these types and calls the
//! hooks around execution. Scenarios and backgrounds are cached units; steps
//! aren't, but report into whichever unit is running them.

use crate::{
    errors::{EngineError, SessionError},
    identifier::TestIdentifier,
    monitor::{TestScope, Visitor},
    session::{Session, TestContext},
};
use camino::{Utf8Path, Utf8PathBuf};
use staleguard_metadata::TestLocation;

/// A host construct that is cached as a unit.
pub trait CacheAdapter {
    /// The identifier the construct is cached under.
    fn identity(&self) -> TestIdentifier;

    /// Runs `block` as this construct's execution in `session`.
    ///
    /// If `block` returns an error, the construct is marked as failed. The
    /// block's result is handed back unchanged.
    fn execution_hook<T, E, F>(
        &self,
        session: &mut Session,
        visitor: &mut dyn Visitor,
        block: F,
    ) -> Result<Result<T, E>, EngineError>
    where
        F: FnOnce(&mut TestScope<'_>) -> Result<T, E>,
    {
        let (result, _) = session.start_test(self.identity(), visitor, |scope| {
            let result = block(&mut *scope);
            if result.is_err() {
                scope.fail();
            }
            result
        })?;
        Ok(result)
    }

    /// Records `path` as touched by the current test.
    fn on_file_touched(
        &self,
        cx: &mut dyn TestContext,
        path: &Utf8Path,
    ) -> Result<(), SessionError> {
        cx.record(path)
    }
}

/// A background: setup shared by every scenario in a feature.
///
/// A background keeps its own record, independent of the scenarios using it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackgroundAdapter {
    location: TestLocation,
}

impl BackgroundAdapter {
    /// Creates an adapter for the background defined at `location`.
    pub fn new(location: TestLocation) -> Self {
        Self { location }
    }

    /// The location the background is defined at.
    pub fn location(&self) -> &TestLocation {
        &self.location
    }
}

impl CacheAdapter for BackgroundAdapter {
    fn identity(&self) -> TestIdentifier {
        TestIdentifier::new(self.location.clone())
    }
}

/// A scenario, optionally preceded by a background.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScenarioAdapter {
    location: TestLocation,
    background: Option<BackgroundAdapter>,
}

impl ScenarioAdapter {
    /// Creates an adapter for a scenario without a background.
    pub fn new(location: TestLocation) -> Self {
        Self {
            location,
            background: None,
        }
    }

    /// Creates an adapter for a scenario that runs after `background`.
    pub fn with_background(location: TestLocation, background: BackgroundAdapter) -> Self {
        Self {
            location,
            background: Some(background),
        }
    }

    /// The background this scenario runs after, if any.
    pub fn background(&self) -> Option<&BackgroundAdapter> {
        self.background.as_ref()
    }
}

impl CacheAdapter for ScenarioAdapter {
    fn identity(&self) -> TestIdentifier {
        match &self.background {
            Some(background) => {
                TestIdentifier::with_dependency(self.location.clone(), background.identity())
            }
            None => TestIdentifier::new(self.location.clone()),
        }
    }
}

/// A step, executed as part of a scenario or background.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepAdapter {
    definition_file: Utf8PathBuf,
}

impl StepAdapter {
    /// Creates an adapter for a step whose definition lives in `definition_file`.
    pub fn new(definition_file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            definition_file: definition_file.into(),
        }
    }

    /// The file the step is defined in.
    pub fn definition_file(&self) -> &Utf8Path {
        &self.definition_file
    }

    /// Runs the step.
    ///
    /// The step definition file is recorded against the current test, and the
    /// current test is marked as failed if `block` returns an error.
    pub fn execution_hook<T, E, F>(
        &self,
        cx: &mut dyn TestContext,
        block: F,
    ) -> Result<Result<T, E>, SessionError>
    where
        F: FnOnce(&mut dyn TestContext) -> Result<T, E>,
    {
        cx.record(&self.definition_file)?;
        let result = block(&mut *cx);
        if result.is_err() {
            cx.fail_current_test()?;
        }
        Ok(result)
    }

    /// Records `path` as touched by the current test.
    pub fn on_file_touched(
        &self,
        cx: &mut dyn TestContext,
        path: &Utf8Path,
    ) -> Result<(), SessionError> {
        cx.record(path)
    }
}

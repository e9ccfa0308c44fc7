// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use camino_tempfile_ext::prelude::*;
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use staleguard_metadata::TestLocation;
use staleguard_runner::{
    adapter::{BackgroundAdapter, CacheAdapter, ScenarioAdapter, StepAdapter},
    config::{CacheSettings, StaleguardConfig},
    coverage::NoCoverage,
    identifier::TestIdentifier,
    monitor::Visitor,
    session::Session,
};
use std::{
    fs,
    time::{Duration, SystemTime},
};

pub(crate) const FEATURE: &str = "features/login.feature";
pub(crate) const GIVEN_STEPS: &str = "steps/given.rs";
pub(crate) const THEN_STEPS: &str = "steps/then.rs";
pub(crate) const USERS_FIXTURE: &str = "fixtures/users.json";

pub(crate) const BACKGROUND_LINE: u32 = 3;
pub(crate) const SCENARIO_LINE: u32 = 7;
pub(crate) const SIBLING_LINE: u32 = 11;

/// A scratch project with one feature: a background, a scenario that runs a
/// given step and a then step, and a sibling scenario that only runs the given
/// step.
pub(crate) struct FeatureProject {
    temp_dir: Utf8TempDir,
    settings: CacheSettings,
}

impl FeatureProject {
    /// Creates the project, optionally with a `.config/staleguard.toml`.
    pub(crate) fn new(config: Option<&str>) -> Result<Self> {
        staleguard_runner::output::init_logging()?;
        let temp_dir = Utf8TempDir::new()?;
        temp_dir
            .child(FEATURE)
            .write_str(
                "Feature: login\n\n  Background:\n\n\n\n  Scenario: valid user\n\n\n\n  Scenario: returning user\n",
            )?;
        temp_dir.child(GIVEN_STEPS).write_str("// given")?;
        temp_dir.child(THEN_STEPS).write_str("// then")?;
        temp_dir.child(USERS_FIXTURE).write_str("[]")?;
        if let Some(config) = config {
            temp_dir
                .child(StaleguardConfig::CONFIG_PATH)
                .write_str(config)?;
        }

        let config = StaleguardConfig::from_sources(temp_dir.path(), None)
            .wrap_err("failed to load project config")?;
        let settings = CacheSettings::new(config, temp_dir.path());
        Ok(Self { temp_dir, settings })
    }

    pub(crate) fn root(&self) -> &Utf8Path {
        self.temp_dir.path()
    }

    pub(crate) fn session(&self) -> Session {
        Session::new(self.settings.clone(), NoCoverage)
    }

    pub(crate) fn background(&self) -> BackgroundAdapter {
        BackgroundAdapter::new(TestLocation::new(FEATURE, BACKGROUND_LINE))
    }

    pub(crate) fn scenario(&self) -> ScenarioAdapter {
        ScenarioAdapter::with_background(
            TestLocation::new(FEATURE, SCENARIO_LINE),
            self.background(),
        )
    }

    pub(crate) fn sibling(&self) -> ScenarioAdapter {
        ScenarioAdapter::with_background(
            TestLocation::new(FEATURE, SIBLING_LINE),
            self.background(),
        )
    }

    /// Runs the background then the scenario, the way a host would for one
    /// scenario. The then step fails if `then_passes` is false.
    ///
    /// Returns the identifiers that were announced as skippable.
    pub(crate) fn run_feature(
        &self,
        session: &mut Session,
        then_passes: bool,
    ) -> Result<Vec<TestIdentifier>> {
        let mut skipped = Vec::new();
        let mut visitor = |id: &TestIdentifier| skipped.push(id.clone());

        let given = StepAdapter::new(GIVEN_STEPS);
        let then = StepAdapter::new(THEN_STEPS);

        self.run_background(session, &mut visitor)?;

        // A failing scenario is an expected outcome here, not a fixture error.
        let _scenario_result = self.scenario().execution_hook(session, &mut visitor, |scope| {
            given.execution_hook(scope, |_| Ok::<_, Report>(()))??;
            then.execution_hook(scope, |_| {
                if then_passes {
                    Ok(())
                } else {
                    Err(eyre!("expected to be logged in"))
                }
            })?
        })?;

        Ok(skipped)
    }

    /// Runs the background then the sibling scenario.
    ///
    /// Returns the identifiers that were announced as skippable.
    pub(crate) fn run_sibling(&self, session: &mut Session) -> Result<Vec<TestIdentifier>> {
        let mut skipped = Vec::new();
        let mut visitor = |id: &TestIdentifier| skipped.push(id.clone());

        let given = StepAdapter::new(GIVEN_STEPS);

        self.run_background(session, &mut visitor)?;
        self.sibling()
            .execution_hook(session, &mut visitor, |scope| {
                given.execution_hook(scope, |_| Ok::<_, Report>(()))??;
                Ok::<_, Report>(())
            })??;

        Ok(skipped)
    }

    fn run_background(
        &self,
        session: &mut Session,
        visitor: &mut dyn Visitor,
    ) -> Result<()> {
        let given = StepAdapter::new(GIVEN_STEPS);
        self.background()
            .execution_hook(session, visitor, |scope| {
                given.execution_hook(scope, |cx| {
                    given.on_file_touched(cx, Utf8Path::new(USERS_FIXTURE))?;
                    Ok::<_, Report>(())
                })??;
                Ok::<_, Report>(())
            })??;
        Ok(())
    }

    /// Sets every project file's modification time to well before any record.
    pub(crate) fn settle(&self) -> Result<()> {
        let past = SystemTime::now() - Duration::from_secs(3600);
        for file in [FEATURE, GIVEN_STEPS, THEN_STEPS, USERS_FIXTURE] {
            self.set_mtime(file, past)?;
        }
        Ok(())
    }

    /// Simulates an edit to `file` after every record was written.
    pub(crate) fn edit(&self, file: &str) -> Result<()> {
        self.set_mtime(file, SystemTime::now() + Duration::from_secs(60))
    }

    pub(crate) fn remove(&self, file: &str) -> Result<()> {
        fs::remove_file(self.root().join(file))
            .wrap_err_with(|| format!("failed to remove {file}"))
    }

    fn set_mtime(&self, file: &str, time: SystemTime) -> Result<()> {
        let path = self.root().join(file);
        fs::File::options()
            .write(true)
            .open(&path)
            .and_then(|file| file.set_modified(time))
            .wrap_err_with(|| format!("failed to set mtime of {path}"))
    }
}

// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino::Utf8Path;
use color_eyre::eyre::{Result, bail, ensure};
use indoc::indoc;
use pretty_assertions::assert_eq;
use staleguard_metadata::{StaleguardExitCode, TestLocation};
use staleguard_runner::{
    adapter::CacheAdapter,
    errors::{EngineError, VerdictError},
    identifier::TestIdentifier,
};
use std::fs;

fn background_id() -> TestIdentifier {
    TestIdentifier::new(TestLocation::new(FEATURE, BACKGROUND_LINE))
}

fn scenario_id() -> TestIdentifier {
    TestIdentifier::new(TestLocation::new(FEATURE, SCENARIO_LINE))
}

fn sibling_id() -> TestIdentifier {
    TestIdentifier::new(TestLocation::new(FEATURE, SIBLING_LINE))
}

#[test]
fn first_run_then_skippable() -> Result<()> {
    let project = FeatureProject::new(None)?;

    let mut session = project.session();
    let skipped = project.run_feature(&mut session, true)?;
    assert!(skipped.is_empty(), "nothing should be skippable: {skipped:?}");
    assert_eq!(session.summary().skippable, 0);
    project.settle()?;

    let mut session = project.session();
    let skipped = project.run_feature(&mut session, true)?;
    assert_eq!(skipped, vec![background_id(), scenario_id()]);
    assert!(session.can_skip()?);
    assert_eq!(session.summary().skippable, 2);
    assert_eq!(session.summary().exit_code(), StaleguardExitCode::OK);

    let recorded = fs::read_to_string(
        project
            .root()
            .join("features/.coverage/login.feature/7/covered_source_files"),
    )?;
    assert_eq!(
        recorded,
        indoc! {"
            features/login.feature
            steps/given.rs
            steps/then.rs
        "}
    );
    Ok(())
}

#[test]
fn edited_step_definition_reruns_scenario() -> Result<()> {
    let project = FeatureProject::new(None)?;
    let mut session = project.session();
    project.run_feature(&mut session, true)?;
    project.run_sibling(&mut session)?;
    project.settle()?;
    project.edit(THEN_STEPS)?;

    let mut session = project.session();
    let skipped = project.run_feature(&mut session, true)?;
    // Only the scenario uses the then step.
    assert_eq!(skipped, vec![background_id()]);
    assert!(!session.can_skip()?);

    // With the edit settled, nothing is dirty any more. The scenario had to
    // run, so its background can't be skipped for the rest of the session, and
    // neither can any other scenario sharing that background.
    project.settle()?;
    let skipped = project.run_sibling(&mut session)?;
    assert!(skipped.is_empty(), "nothing should be skippable: {skipped:?}");
    let skipped = project.run_feature(&mut session, true)?;
    assert!(skipped.is_empty(), "nothing should be skippable: {skipped:?}");
    assert_eq!(session.summary().skippable, 1);

    // Forcing doesn't outlive the session.
    let skipped = project.run_sibling(&mut project.session())?;
    assert_eq!(skipped, vec![background_id(), sibling_id()]);
    Ok(())
}

#[test]
fn edited_background_step_reruns_both() -> Result<()> {
    let project = FeatureProject::new(None)?;
    project.run_feature(&mut project.session(), true)?;
    project.settle()?;
    project.edit(USERS_FIXTURE)?;

    let skipped = project.run_feature(&mut project.session(), true)?;
    assert!(skipped.is_empty(), "nothing should be skippable: {skipped:?}");
    Ok(())
}

#[test]
fn failed_then_passing() -> Result<()> {
    let project = FeatureProject::new(None)?;

    let mut session = project.session();
    project.run_feature(&mut session, false)?;
    assert_eq!(session.summary().failed, 1);
    assert_eq!(
        session.summary().exit_code(),
        StaleguardExitCode::TEST_RUN_FAILED
    );
    project.settle()?;

    // Nothing changed, but the scenario failed last time.
    let mut session = project.session();
    let skipped = project.run_feature(&mut session, true)?;
    assert_eq!(skipped, vec![background_id()]);
    assert_eq!(session.summary().failed, 0);
    assert_eq!(session.summary().exit_code(), StaleguardExitCode::OK);
    project.settle()?;

    let skipped = project.run_feature(&mut project.session(), true)?;
    assert_eq!(skipped, vec![background_id(), scenario_id()]);
    Ok(())
}

#[test]
fn removed_file_is_dirty_by_default() -> Result<()> {
    let project = FeatureProject::new(None)?;
    project.run_feature(&mut project.session(), true)?;
    project.settle()?;
    project.remove(USERS_FIXTURE)?;

    let skipped = project.run_feature(&mut project.session(), true)?;
    assert!(skipped.is_empty(), "nothing should be skippable: {skipped:?}");
    Ok(())
}

#[test]
fn removed_file_errors_when_configured() -> Result<()> {
    let project = FeatureProject::new(Some(indoc! {r#"
        [cache]
        missing-files = "error"
    "#}))?;
    project.run_feature(&mut project.session(), true)?;
    project.settle()?;
    project.remove(USERS_FIXTURE)?;

    let Err(error) = project.run_feature(&mut project.session(), true) else {
        bail!("run should have failed: a recorded file is missing");
    };
    let Some(error) = error.downcast_ref::<EngineError>() else {
        bail!("expected an engine error, found {error:?}");
    };
    match error {
        EngineError::Verdict(VerdictError::MissingSourceFile { location, path }) => {
            assert_eq!(location, &TestLocation::new(FEATURE, BACKGROUND_LINE));
            assert_eq!(path, &project.root().join(USERS_FIXTURE));
        }
        other => bail!("expected MissingSourceFile, found {other:?}"),
    }
    assert_eq!(error.process_exit_code(), StaleguardExitCode::CACHE_ERROR);
    Ok(())
}

#[test]
fn configured_cache_dir_name() -> Result<()> {
    let project = FeatureProject::new(Some(indoc! {r#"
        [cache]
        dir-name = ".staleguard"
    "#}))?;
    let mut session = project.session();
    project.run_feature(&mut session, false)?;

    let record_dir = project.root().join("features/.staleguard/login.feature");
    ensure!(
        !project.root().join("features/.coverage").exists(),
        "default cache dir should not be used"
    );
    assert_eq!(
        fs::read_to_string(record_dir.join("3/last_run_status"))?,
        "passed\n"
    );
    assert_eq!(
        fs::read_to_string(record_dir.join("7/last_run_status"))?,
        "failed\n"
    );

    // Between tests, the session reports into the last one started.
    project
        .scenario()
        .on_file_touched(&mut session, Utf8Path::new("steps/teardown.rs"))?;
    assert_eq!(session.current_test(), Some(&scenario_id()));
    Ok(())
}

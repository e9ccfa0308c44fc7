// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for processes hosting staleguard.
///
/// The engine itself never exits the process. Hosts map the outcome of a run to
/// one of these codes.
///
/// Unknown/unexpected failures should always result in exit code 1.
pub enum StaleguardExitCode {}

impl StaleguardExitCode {
    /// Every test either passed or was skippable, and no errors occurred.
    pub const OK: i32 = 0;

    /// One or more tests were marked failed.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// The staleguard configuration could not be read.
    pub const CONFIG_ERROR: i32 = 96;

    /// A cache record could not be read or written.
    pub const CACHE_ERROR: i32 = 97;
}

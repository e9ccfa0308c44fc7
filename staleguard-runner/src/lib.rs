// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Coverage-driven caching for test suites.
//!
//! For every test, staleguard records which source files the test touched while
//! it ran and whether it passed. On the next run, a test only needs to execute
//! again if one of those files changed, if it failed last time, or if a test it
//! depends on needs to execute.
//!
//! The basic flow is:
//!
//! 1. The host builds a [`Session`](session::Session) from
//!    [`CacheSettings`](config::CacheSettings) and a
//!    [`CoverageCollector`](coverage::CoverageCollector).
//! 2. For each test, the host calls
//!    [`Session::start_test`](session::Session::start_test) around the test body.
//! 3. Step hooks inside the body record extra files and failures through the
//!    [`TestContext`](session::TestContext) they are handed.
//! 4. Afterwards, [`Session::can_skip`](session::Session::can_skip) tells the host
//!    whether the test was needed at all.

pub mod adapter;
pub mod cache;
pub mod config;
pub mod coverage;
pub mod errors;
pub mod executor;
mod helpers;
pub mod identifier;
pub mod monitor;
pub mod output;
pub mod session;
pub mod summary;
#[cfg(test)]
mod test_helpers;

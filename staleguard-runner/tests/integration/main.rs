// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving whole sessions over a scratch project.
//!
//! Each test builds a small feature project in a temporary directory, runs one
//! or more sessions over it, and edits files in between. Modification times are
//! set explicitly rather than relying on the filesystem clock.

mod fixtures;
mod scenarios;

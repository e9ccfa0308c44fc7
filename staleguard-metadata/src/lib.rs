// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Data shared between staleguard's caching engine and the test frameworks that
//! host it.
//!
//! This crate is deliberately small: it describes *where* a test lives
//! ([`TestLocation`]), the outcome stored for it ([`RunStatus`]), and the exit
//! codes a host process should use ([`StaleguardExitCode`]).

mod errors;
mod exit_codes;
mod location;
mod status;

pub use errors::*;
pub use exit_codes::*;
pub use location::*;
pub use status::*;

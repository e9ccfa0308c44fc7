// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Cache, RecordKind, record_dir};
use crate::{config::CacheSettings, errors::CacheError};
use camino::{Utf8Path, Utf8PathBuf};
use staleguard_metadata::{RunStatus, TestLocation};
use tracing::warn;

/// The outcome of the last run of a test.
///
/// Only the most recent outcome is kept.
#[derive(Clone, Debug)]
pub struct StatusCache {
    path: Utf8PathBuf,
}

impl StatusCache {
    /// Creates the status cache for the test at `location`.
    ///
    /// Nothing is read or written until a method is called.
    pub fn new(settings: &CacheSettings, location: &TestLocation) -> Result<Self, CacheError> {
        let path = record_dir(settings, location)?.join(Self::KIND.file_name());
        Ok(Self { path })
    }

    /// Returns the stored status.
    ///
    /// `None` means the record holds something other than a known status. Check
    /// [`exists`](Cache::exists) first: reading an absent record is an error.
    pub fn last_run_status(&self) -> Result<Option<RunStatus>, CacheError> {
        let lines = self.read_lines()?;
        let token = lines.first().map(String::as_str).unwrap_or_default();
        match token.parse() {
            Ok(status) => Ok(Some(status)),
            Err(error) => {
                warn!(path = %self.path, "ignoring status record: {error}");
                Ok(None)
            }
        }
    }

    /// Overwrites the stored status.
    pub fn record(&self, status: RunStatus) -> Result<(), CacheError> {
        self.scoped_write(|out| writeln!(out, "{status}"))
    }
}

impl Cache for StatusCache {
    const KIND: RecordKind = RecordKind::Status;

    fn path(&self) -> &Utf8Path {
        &self.path
    }
}

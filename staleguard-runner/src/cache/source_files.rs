// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Cache, RecordKind, record_dir};
use crate::{
    config::{CacheSettings, MissingFilePolicy},
    errors::{CacheError, VerdictError},
};
use camino::{Utf8Path, Utf8PathBuf};
use staleguard_metadata::TestLocation;
use std::{fs, io};
use tracing::debug;

/// The source files observed to affect a test.
///
/// Paths are stored relative to the run's working directory, one per line.
#[derive(Clone, Debug)]
pub struct SourceFileCache {
    path: Utf8PathBuf,
    location: TestLocation,
    working_dir: Utf8PathBuf,
    missing_files: MissingFilePolicy,
}

impl SourceFileCache {
    /// Creates the source file cache for the test at `location`.
    pub fn new(settings: &CacheSettings, location: &TestLocation) -> Result<Self, CacheError> {
        let path = record_dir(settings, location)?.join(Self::KIND.file_name());
        Ok(Self {
            path,
            location: location.clone(),
            working_dir: settings.working_dir().to_owned(),
            missing_files: settings.missing_files(),
        })
    }

    /// Overwrites the stored list of files.
    pub fn save<I, P>(&self, files: I) -> Result<(), CacheError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        self.scoped_write(|out| {
            for file in files {
                writeln!(out, "{}", file.as_ref())?;
            }
            Ok(())
        })
    }

    /// Returns the stored list of files, in the order they were recorded.
    pub fn files(&self) -> Result<Vec<Utf8PathBuf>, CacheError> {
        Ok(self
            .read_lines()?
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(Utf8PathBuf::from)
            .collect())
    }

    /// Returns true if any stored file was modified at or after the time this
    /// record was written.
    ///
    /// Equal timestamps count as modified, since filesystem clocks are coarse.
    /// A file that no longer exists is handled according to the configured
    /// [`MissingFilePolicy`].
    pub fn any_dirty_files(&self) -> Result<bool, VerdictError> {
        let written_at = self.last_modified_time()?;

        for file in self.files()? {
            let path = self.working_dir.join(&file);
            let modified = match fs::metadata(&path).and_then(|metadata| metadata.modified()) {
                Ok(modified) => modified,
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    return match self.missing_files {
                        MissingFilePolicy::Dirty => {
                            debug!(location = %self.location, %file, "recorded file no longer exists");
                            Ok(true)
                        }
                        MissingFilePolicy::Error => Err(VerdictError::MissingSourceFile {
                            location: self.location.clone(),
                            path,
                        }),
                    };
                }
                Err(error) => return Err(VerdictError::SourceMetadata { path, error }),
            };

            if modified >= written_at {
                debug!(location = %self.location, %file, "recorded file changed");
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl Cache for SourceFileCache {
    const KIND: RecordKind = RecordKind::TouchedFiles;

    fn path(&self) -> &Utf8Path {
        &self.path
    }
}

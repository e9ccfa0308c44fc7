// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent per-test cache records.
//!
//! Each test has one directory of records, located next to the file the test is
//! defined in:
//!
//! ```text
//! <feature-file-directory>/.coverage/<feature-file-name>/<line>/
//!     last_run_status
//!     covered_source_files
//! ```
//!
//! The location only depends on the test's file and line, so separate processes
//! running the same test agree on it.

mod source_files;
mod status;

pub use source_files::*;
pub use status::*;

use crate::{config::CacheSettings, errors::CacheError, helpers::absolutize};
use camino::{Utf8Path, Utf8PathBuf};
use staleguard_metadata::TestLocation;
use std::{
    fs,
    io::{self, BufRead, BufReader, BufWriter, Write},
    time::SystemTime,
};
use tracing::debug;

/// The kinds of record stored for each test.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RecordKind {
    /// The outcome of the last run.
    Status,

    /// The source files touched by the last run.
    TouchedFiles,
}

impl RecordKind {
    /// The file name this record is stored under.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Status => "last_run_status",
            Self::TouchedFiles => "covered_source_files",
        }
    }
}

/// Returns the directory holding all records for the test at `location`.
///
/// The test's file is made absolute against the working directory first.
pub fn record_dir(
    settings: &CacheSettings,
    location: &TestLocation,
) -> Result<Utf8PathBuf, CacheError> {
    let file = absolutize(location.file(), settings.working_dir());
    let (Some(parent), Some(file_name)) = (file.parent(), file.file_name()) else {
        return Err(CacheError::InvalidLocation {
            location: location.clone(),
        });
    };

    Ok(parent
        .join(settings.cache_dir_name())
        .join(file_name)
        .join(location.line().to_string()))
}

/// A persistent record keyed by a test.
///
/// Implementors only provide the record's path; reading and writing are shared.
pub trait Cache {
    /// The kind of record this is.
    const KIND: RecordKind;

    /// The path of the record file.
    fn path(&self) -> &Utf8Path;

    /// Returns true if the record has been written.
    fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Replaces the record with whatever `writer` writes.
    ///
    /// Missing parent directories are created. The new contents are written to
    /// a temporary file which is renamed over the record once `writer` returns
    /// successfully, so the handle is always flushed and closed, and a failing
    /// writer leaves the previous record untouched.
    fn scoped_write<F>(&self, writer: F) -> Result<(), CacheError>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| CacheError::CreateDir {
                path: parent.to_owned(),
                error,
            })?;
        }

        atomicwrites::AtomicFile::new(path, atomicwrites::AllowOverwrite)
            .write(|file| {
                let mut buf = BufWriter::new(file);
                writer(&mut buf)?;
                buf.flush()
            })
            .map_err(|error| CacheError::Write {
                path: path.to_owned(),
                error,
            })?;

        debug!(kind = ?Self::KIND, %path, "wrote cache record");
        Ok(())
    }

    /// Reads the record's lines, in order.
    fn read_lines(&self) -> Result<Vec<String>, CacheError> {
        let path = self.path();
        let map_err = |error| CacheError::Read {
            path: path.to_owned(),
            error,
        };

        let file = fs::File::open(path).map_err(map_err)?;
        BufReader::new(file)
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .map_err(map_err)
    }

    /// Returns the time the record was last written.
    fn last_modified_time(&self) -> Result<SystemTime, CacheError> {
        let path = self.path();
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|error| CacheError::Metadata {
                path: path.to_owned(),
                error,
            })
    }
}

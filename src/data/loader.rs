//! CSV Data Loader Module
//! Reads the crash CSV with Polars once per session and hands out a shared,
//! read-only `Dataset`.

use super::processor::CrashTable;
use super::schema::{self, SchemaError, PERIOD, REGION};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("The file {} was not found. Please check the file path.", .path.display())]
    DataUnavailable { path: PathBuf },
    #[error("The file {} is empty. Please check the file contents.", .path.display())]
    DataEmpty { path: PathBuf },
    #[error("The file {} could not be read: {reason}", .path.display())]
    DataMalformed { path: PathBuf, reason: String },
}

/// The crash table of one session.
///
/// Cloning is cheap and every clone points at the same frame. The frame is
/// never mutated after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: Arc<DataFrame>,
    source: PathBuf,
}

impl Dataset {
    /// Validate a raw frame and wrap it.
    pub fn from_frame(raw: &DataFrame, source: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        Ok(Self {
            frame: Arc::new(schema::normalize(raw)?),
            source: source.into(),
        })
    }

    /// Path the dataset was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Distinct regions, in the order they first appear.
    pub fn regions(&self) -> PolarsResult<Vec<String>> {
        schema::distinct_labels(&self.frame, REGION)
    }

    /// Distinct periods, in the order they first appear.
    pub fn periods(&self) -> PolarsResult<Vec<String>> {
        schema::distinct_labels(&self.frame, PERIOD)
    }

    pub fn column_max(&self, name: &str) -> PolarsResult<i64> {
        schema::column_max(&self.frame, name)
    }
}

impl CrashTable for Dataset {
    fn frame(&self) -> &DataFrame {
        &self.frame
    }
}

/// Session-scoped loader. Keeps the last successfully loaded dataset and
/// returns it again for the same path without touching the file.
pub struct DataLoader {
    cached: Option<Dataset>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Load the dataset at `path`, reusing the cached one if it came from the
    /// same path.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Dataset, LoaderError> {
        let path = path.as_ref();

        if let Some(dataset) = self.cached.as_ref().filter(|d| d.source() == path) {
            debug!(path = %path.display(), "reusing cached dataset");
            return Ok(dataset.clone());
        }

        let dataset = read_csv(path).inspect_err(|e| warn!("load failed: {e}"))?;
        info!(
            path = %path.display(),
            rows = dataset.height(),
            "dataset loaded"
        );
        self.cached = Some(dataset.clone());
        Ok(dataset)
    }

    /// The dataset of the current session, if one was loaded.
    #[cfg(test)]
    pub fn cached(&self) -> Option<&Dataset> {
        self.cached.as_ref()
    }
}

fn read_csv(path: &Path) -> Result<Dataset, LoaderError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        _ => {
            return Err(LoaderError::DataUnavailable {
                path: path.to_path_buf(),
            })
        }
    };
    if metadata.len() == 0 {
        return Err(LoaderError::DataEmpty {
            path: path.to_path_buf(),
        });
    }

    let raw = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(|e| match e {
            PolarsError::NoData(_) => LoaderError::DataEmpty {
                path: path.to_path_buf(),
            },
            other => LoaderError::DataMalformed {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

    if raw.height() == 0 {
        return Err(LoaderError::DataEmpty {
            path: path.to_path_buf(),
        });
    }

    Dataset::from_frame(&raw, path).map_err(|e| LoaderError::DataMalformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

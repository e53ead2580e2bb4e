use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::CatalogRecord;

/// File names of the three precomputed blobs under the artifacts directory
pub const INDEX_FILE: &str = "index.bin";
pub const MATRIX_FILE: &str = "matrix.bin";
pub const RECORDS_FILE: &str = "records.bin";

/// Errors raised while loading the catalog artifacts.
///
/// A load failure is not fatal to the process: the service keeps running and
/// catalog-dependent endpoints answer 503 instead.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: bincode::Error,
    },

    #[error("feature matrix claims {rows}x{cols} but holds {len} values")]
    MalformedMatrix { rows: usize, cols: usize, len: usize },

    #[error("artifact row counts disagree: index={index}, matrix={matrix}, records={records}")]
    RowCountMismatch {
        index: usize,
        matrix: usize,
        records: usize,
    },
}

/// Dense row-major feature matrix, one row per catalog item.
///
/// The column space is an opaque TF-IDF vocabulary produced offline; the
/// service only ever compares whole rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f32>,
}

impl FeatureMatrix {
    /// Borrow row `i` as a feature vector. Callers must keep `i < rows`;
    /// `Catalog::load` guarantees `values.len() == rows * cols`.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }
}

/// The three startup artifacts, loaded once and shared read-only for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// title -> zero-based row position
    pub index: HashMap<String, usize>,
    pub matrix: FeatureMatrix,
    pub records: Vec<CatalogRecord>,
}

impl Catalog {
    /// Reads the three artifact blobs from `dir` and checks that they agree
    /// on the number of rows. Happens exactly once, at startup.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();

        let index: HashMap<String, usize> = read_blob(&dir.join(INDEX_FILE))?;
        let matrix: FeatureMatrix = read_blob(&dir.join(MATRIX_FILE))?;
        let records: Vec<CatalogRecord> = read_blob(&dir.join(RECORDS_FILE))?;

        if matrix.values.len() != matrix.rows * matrix.cols {
            return Err(LoadError::MalformedMatrix {
                rows: matrix.rows,
                cols: matrix.cols,
                len: matrix.values.len(),
            });
        }

        if index.len() != matrix.rows || records.len() != matrix.rows {
            return Err(LoadError::RowCountMismatch {
                index: index.len(),
                matrix: matrix.rows,
                records: records.len(),
            });
        }

        tracing::info!(
            titles = index.len(),
            features = matrix.cols,
            "Catalog artifacts loaded"
        );

        Ok(Self {
            index,
            matrix,
            records,
        })
    }
}

fn read_blob<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    bincode::deserialize(&bytes).map_err(|source| LoadError::Decode {
        path: path.display().to_string(),
        source,
    })
}

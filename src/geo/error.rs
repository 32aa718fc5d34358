//! Dataset load error types.

use thiserror::Error;

use crate::models::Level;

/// Errors raised while loading and validating the reference dataset.
///
/// These only occur at load time; lookups themselves are infallible and
/// signal absence through `Option`.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading a dataset file from disk failed
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV syntax error in a dataset file
    #[error("{file}.csv: malformed CSV")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    /// Manifest TOML could not be parsed
    #[error("manifest.toml: {0}")]
    Manifest(#[from] toml::de::Error),

    /// A code column is not exactly two ASCII digits
    #[error("{file}.csv record {record}: invalid code {value:?}")]
    BadCode {
        file: &'static str,
        record: usize,
        value: String,
    },

    /// Two rows share the same composite key
    #[error("{file}.csv record {record}: duplicate {level} key {key}")]
    DuplicateKey {
        file: &'static str,
        record: usize,
        level: Level,
        key: String,
    },

    /// A row references a parent unit that is not in the dataset
    #[error("{file}.csv record {record}: {level} {key} references unknown parent {parent}")]
    OrphanRecord {
        file: &'static str,
        record: usize,
        level: Level,
        key: String,
        parent: String,
    },
}

//! Loaders for the JSON files a command consumes: test files, context files
//! and query files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::TestCaseSetup;

/// A generic loader for JSON files.
pub struct JsonFileLoader {
    path: PathBuf,
}

/// Errors that can occur while loading a JSON file.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    IoError {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid for the expected shape.
    #[error("Failed to parse {}: {source}", path.display())]
    ParseError {
        /// The file that was being parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl JsonFileLoader {
    /// Creates a new `JsonFileLoader`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the file and deserializes it into `T`.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T, LoaderError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|source| LoaderError::IoError { path: self.path.clone(), source })?;

        serde_json::from_str(&content)
            .map_err(|source| LoaderError::ParseError { path: self.path.clone(), source })
    }
}

/// Loads the list of setups of a test file.
pub fn load_setups(path: &Path) -> Result<Vec<TestCaseSetup>, LoaderError> {
    let setups: Vec<TestCaseSetup> = JsonFileLoader::new(path).load()?;
    tracing::debug!(path = %path.display(), count = setups.len(), "Loaded test case setups.");
    Ok(setups)
}

/// Loads a single setup from a context file.
pub fn load_setup(path: &Path) -> Result<TestCaseSetup, LoaderError> {
    JsonFileLoader::new(path).load()
}

/// Loads a query document. The document must be a JSON object.
pub fn load_query(path: &Path) -> Result<Map<String, Value>, LoaderError> {
    JsonFileLoader::new(path).load()
}

use std::io;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no tags found in {payloads} payload(s)")]
pub struct EmptyInputError {
    pub payloads: usize,
}

#[derive(Debug, Error)]
#[error("failed to read {name}: {source}")]
pub struct FileReadError {
    pub name: String,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no .txt files among the {selected} selected item(s)")]
    NoValidFiles { selected: usize },
    #[error(
        "the selected .txt files contain no tags ({} of {attempted} could not be read)",
        .failures.len()
    )]
    EmptyInput {
        attempted: usize,
        failures: Vec<FileReadError>,
        /// Selected items skipped for not being `.txt` files.
        ignored: Vec<String>,
    },
}

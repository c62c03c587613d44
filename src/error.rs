//! Error types for mdqti operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a conversion.
///
/// Malformed directives and unparseable numeric answers never show up here;
/// the parser and encoder recover from those in place.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No questions found in markdown content")]
    NoQuestions,

    #[error("Invalid frontmatter: {0}")]
    Frontmatter(String),

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("YAML output error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML writing error: {0}")]
    Xml(String),
}

pub type Result<T> = std::result::Result<T, Error>;

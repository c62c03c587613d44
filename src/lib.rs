//! Convert markdown quiz files into Canvas-importable QTI 1.2 packages.
//!
//! ```no_run
//! use mdqti::config::Config;
//! use mdqti::package::Converter;
//! use std::path::Path;
//!
//! let markdown = std::fs::read_to_string("quiz.md")?;
//! let conversion = Converter::new(Config::default()).convert(&markdown, Path::new("quiz.zip"))?;
//! println!("{} questions", conversion.question_count);
//! # Ok::<(), mdqti::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod ident;
pub mod manifest;
pub mod model;
pub mod package;
pub mod parser;
pub mod qti;
pub mod xml;

pub use error::{Error, Result};

use std::io;
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The text does not follow the config file grammar. Loading stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing trailing newline")]
    MissingTrailingNewline,
    #[error("section name is null")]
    SectionNameEmpty,
    #[error("repeat section name: {name:?}")]
    RepeatSectionName { name: String },
    #[error("key already exists: {key:?} in section {section:?}")]
    KeyAlreadyExists { section: String, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("section not found: {section:?}")]
    SectionNotFound { section: String },
    #[error("key not found: {key:?} in section {section:?}")]
    KeyNotFound { section: String, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid integer: {value:?}")]
    Int {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid float: {value:?}")]
    Float {
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

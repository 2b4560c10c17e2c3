#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! Reads small INI-like settings files into a read-only [`Config`].
//!
//! ```text
//! # default section
//! ip = 127.0.0.1
//! port=1234
//!
//! [broker]
//!   listen_port = 7777
//! time = 10
//! ```
//!
//! Every space in the file is removed before parsing, including spaces inside values. Lines
//! starting with `#` are comments, and lines that are neither `[name]` nor `key=value` are
//! ignored. The file must end with a newline.
//!
//! ```no_run
//! let cfg = rdcfg::Config::from_path("app.cfg")?;
//! let ip = cfg.get_default("ip")?;
//! let port = cfg.get_int("broker", "listen_port")?;
//! # Ok::<(), rdcfg::Error>(())
//! ```

mod error;
mod parser;
mod section;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

pub use error::{Error, FormatError, LookupError, ParseError};
pub use section::{Iter, Section};

use parser::Parser;

/// Name of the section holding the entries above the first header. Headers can never produce
/// it because spaces are stripped before they are read.
pub const DEFAULT_SECTION: &str = " ";

/// UTF-8 encoded Byte Order Mark. Some editors prepend it, and it would otherwise become part of
/// the first key.
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone)]
pub struct Config {
    sections: HashMap<String, Section>,
}

impl Config {
    /// Reads the whole file at `path` and parses it.
    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::debug!("loading config from {}", path.display());

        let data = fs::read(path)?;
        Self::parse(&decode_data(data)?)
    }

    pub fn from_reader<R>(reader: &mut R) -> Result<Self, Error>
    where
        R: Read,
    {
        let mut data = Vec::with_capacity(4096);
        reader.read_to_end(&mut data)?;

        Self::parse(&decode_data(data)?)
    }

    /// Parses the complete content of a config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for the first grammar violation. Nothing is returned unless the
    /// whole text is valid.
    pub fn parse(text: &str) -> Result<Self, Error> {
        if !text.ends_with('\n') {
            return Err(FormatError::MissingTrailingNewline.into());
        }

        let text = text.replace(' ', "");
        let sections = Parser::new(&text).into_sections()?;
        log::debug!("loaded {} config sections", sections.len());

        Ok(Self { sections })
    }

    /// Returns the named section, or the default section when `name` is empty.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(resolve_section(name))
    }

    /// Visits every section, including the default one. The order is unspecified.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Returns the raw value of `key`. An empty `section` means the default section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] if either the section or the key does not exist.
    pub fn get(&self, section: &str, key: &str) -> Result<&str, Error> {
        let name = resolve_section(section);
        let section = self
            .sections
            .get(name)
            .ok_or_else(|| LookupError::SectionNotFound {
                section: name.to_owned(),
            })?;

        let value = section.get(key).ok_or_else(|| LookupError::KeyNotFound {
            section: name.to_owned(),
            key: key.to_owned(),
        })?;

        Ok(value)
    }

    pub fn get_int(&self, section: &str, key: &str) -> Result<i64, Error> {
        let value = self.get(section, key)?;

        value.parse::<i64>().map_err(|source| {
            ParseError::Int {
                value: value.to_owned(),
                source,
            }
            .into()
        })
    }

    pub fn get_float(&self, section: &str, key: &str) -> Result<f64, Error> {
        let value = self.get(section, key)?;

        value.parse::<f64>().map_err(|source| {
            ParseError::Float {
                value: value.to_owned(),
                source,
            }
            .into()
        })
    }

    pub fn get_default(&self, key: &str) -> Result<&str, Error> {
        self.get("", key)
    }

    pub fn get_default_int(&self, key: &str) -> Result<i64, Error> {
        self.get_int("", key)
    }

    pub fn get_default_float(&self, key: &str) -> Result<f64, Error> {
        self.get_float("", key)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn resolve_section(name: &str) -> &str {
    if name.is_empty() { DEFAULT_SECTION } else { name }
}

// Config files are expected to be UTF-8 (or plain ASCII).
fn decode_data(mut data: Vec<u8>) -> Result<String, Error> {
    if data.starts_with(BOM_UTF8) {
        data.drain(..BOM_UTF8.len());
    }

    String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

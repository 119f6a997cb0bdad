// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::collection_name::CollectionName;
use crate::types::transition_step::TransitionStep;

/// The category of an error. Presentation code matches on this to decide
/// what to tell the user; the message is for humans.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// No source is open.
    StoreUnavailable,
    /// The source lacks a required collection, or a collection does not
    /// have the five-field record shape.
    SchemaMismatch,
    /// A transition failed part way through. `mutated` lists the
    /// collections that were changed before `step` failed.
    TransitionFailed {
        step: TransitionStep,
        mutated: Vec<CollectionName>,
    },
    /// A line of the progress log could not be parsed. Lines are 1-based.
    StatsLogCorrupt { line: usize },
    /// Anything else: I/O, SQLite, config parsing.
    Other,
}

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    kind: ErrorKind,
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            kind: ErrorKind::Other,
            message: msg.into(),
        }
    }

    pub fn with_kind(kind: ErrorKind, msg: impl Into<String>) -> Self {
        ErrorReport {
            kind,
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::new(format!("I/O error: {value:#?}"))
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(value: rusqlite::Error) -> Self {
        ErrorReport::new(format!("database error: {value}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(format!("JSON error: {value:#?}"))
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport::new(format!("config error: {value}"))
    }
}

impl From<csv::Error> for ErrorReport {
    fn from(value: csv::Error) -> Self {
        ErrorReport::new(format!("CSV error: {value}"))
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::new(msg))
}

pub fn fail_with<T>(kind: ErrorKind, msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::with_kind(kind, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ErrorReport::new("directory does not exist.");
        assert_eq!(err.to_string(), "error: directory does not exist.");
        assert_eq!(err.kind(), &ErrorKind::Other);
    }

    #[test]
    fn test_fail_with_kind() {
        let result: Fallible<()> = fail_with(ErrorKind::StoreUnavailable, "no source is open");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreUnavailable);
        assert_eq!(err.message(), "no source is open");
    }

    #[test]
    fn test_io_error_is_other() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ErrorReport = io.into();
        assert_eq!(err.kind(), &ErrorKind::Other);
    }
}

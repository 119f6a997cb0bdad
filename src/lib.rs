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

//! vocabdrill: a vocabulary review engine over an SQLite word list.
//!
//! A source holds four collections of entries: the corpus, the review
//! queue, and the known and new lists. This library provides:
//! - The entry store over the SQLite file
//! - Transitions between collections (mark known, mark new, refresh, clear)
//! - Sequential and random selection of the next entry
//! - Session counters and the daily progress log
//! - A controller exposing all of it to a front-end

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
#[cfg(test)]
mod helper;
pub mod progress;
pub mod review;
pub mod selection;
pub mod store;
pub mod transition;
pub mod types;

// Re-exports for convenience
pub use error::{ErrorKind, ErrorReport, Fallible, fail};
pub use review::{EntryView, Pronounceable, ReviewController};
pub use selection::ReviewMode;
pub use types::collection_name::CollectionName;
pub use types::entry::{Entry, EntryId};

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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::collections::list_collections;
use crate::cmd::drill::drill;
use crate::cmd::manage::clear_collection;
use crate::cmd::manage::import_corpus;
use crate::cmd::manage::init_source;
use crate::cmd::manage::refresh_queue;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;
use crate::selection::ReviewMode;
use crate::types::collection_name::CollectionName;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Review the queue, or another collection, in the terminal.
    Drill {
        /// Path to the SQLite source.
        source: PathBuf,
        /// How to pick the next entry.
        #[arg(long, default_value_t = ReviewMode::Sequential)]
        mode: ReviewMode,
        /// Which collection to review.
        #[arg(long, default_value_t = CollectionName::Queue)]
        collection: CollectionName,
    },
    /// List every table in the source with its size.
    Collections {
        /// Path to the SQLite source.
        source: PathBuf,
    },
    /// Rebuild the queue from the corpus, leaving out known and new entries.
    Refresh {
        /// Path to the SQLite source.
        source: PathBuf,
    },
    /// Remove every entry from the known list. Run `refresh` afterwards to
    /// review them again.
    ClearKnown {
        /// Path to the SQLite source.
        source: PathBuf,
    },
    /// Remove every entry from the new list. Run `refresh` afterwards to
    /// review them again.
    ClearNew {
        /// Path to the SQLite source.
        source: PathBuf,
    },
    /// Print daily review statistics.
    Stats {
        /// Path to the SQLite source.
        source: PathBuf,
        /// Only print the most recent days. Default is 7.
        #[arg(long, default_value_t = 7)]
        days: usize,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Create an empty source with the four collection tables.
    Init {
        /// Path of the SQLite file to create.
        source: PathBuf,
    },
    /// Add entries from a comma-separated file to the corpus. Each row is
    /// `id,term,gloss,example,note`, with no header.
    Import {
        /// Path to the SQLite source.
        source: PathBuf,
        /// Path to the file to import.
        file: PathBuf,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            source,
            mode,
            collection,
        } => drill(&source, mode, collection),
        Command::Collections { source } => list_collections(&source),
        Command::Refresh { source } => refresh_queue(&source),
        Command::ClearKnown { source } => clear_collection(&source, CollectionName::Known),
        Command::ClearNew { source } => clear_collection(&source, CollectionName::New),
        Command::Stats {
            source,
            days,
            format,
        } => print_stats(&source, days, format),
        Command::Init { source } => init_source(&source),
        Command::Import { source, file } => import_corpus(&source, &file),
    }
}

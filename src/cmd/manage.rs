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

//! One-shot maintenance commands. None of these write the progress log:
//! there is no review session to record.

use std::fs::File;
use std::path::Path;

use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::progress::Session;
use crate::store::EntryStore;
use crate::transition;
use crate::types::collection_name::CollectionName;

fn open(source: &Path) -> Fallible<EntryStore> {
    let config = Config::for_source(source)?;
    EntryStore::open(source, config.tables)
}

pub fn refresh_queue(source: &Path) -> Fallible<()> {
    let store = open(source)?;
    let size = transition::rebuild_queue(&store, &mut Session::new())?;
    println!("Queue rebuilt with {size} entries.");
    Ok(())
}

pub fn clear_collection(source: &Path, collection: CollectionName) -> Fallible<()> {
    let store = open(source)?;
    let removed = match collection {
        CollectionName::Known => transition::clear_known(&store)?,
        CollectionName::New => transition::clear_new(&store)?,
        _ => return fail(format!("the {collection} collection cannot be cleared")),
    };
    println!("Removed {removed} entries from {collection}.");
    Ok(())
}

pub fn init_source(source: &Path) -> Fallible<()> {
    let config = Config::for_source(source)?;
    EntryStore::create(source, config.tables)?;
    println!("Created {}.", source.display());
    Ok(())
}

pub fn import_corpus(source: &Path, file: &Path) -> Fallible<()> {
    if !file.exists() {
        return fail(format!("file does not exist: {}", file.display()));
    }
    let store = open(source)?;
    let (inserted, skipped) = store.import_corpus(File::open(file)?)?;
    println!("Imported {inserted} entries ({skipped} already present).");
    Ok(())
}

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

use tempfile::TempDir;
use tempfile::tempdir;

use crate::config::TableNames;
use crate::error::Fallible;
use crate::store::EntryStore;
use crate::types::collection_name::CollectionName;
use crate::types::entry::Entry;

/// Three entries with ids 1, 2, 3.
pub fn sample_entries() -> Vec<Entry> {
    vec![
        Entry::new(1, "a", "A", "Voici a.", "first"),
        Entry::new(2, "b", "B", "", "second"),
        Entry::new(3, "c", "C", "Voilà c.", "third"),
    ]
}

/// An in-memory store whose corpus holds the sample entries. The other
/// collections are empty.
pub fn seeded_store() -> Fallible<EntryStore> {
    let store = EntryStore::create_in_memory()?;
    for entry in sample_entries() {
        store.insert_if_absent(CollectionName::Corpus, &entry)?;
    }
    Ok(store)
}

/// A source file in a fresh temporary directory, seeded like
/// `seeded_store`. The directory lives as long as the returned guard.
pub fn create_tmp_source() -> Fallible<(TempDir, PathBuf)> {
    let dir = tempdir()?;
    let path = dir.path().join("words.db");
    let store = EntryStore::create(&path, TableNames::default())?;
    for entry in sample_entries() {
        store.insert_if_absent(CollectionName::Corpus, &entry)?;
    }
    Ok((dir, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_source() -> Fallible<()> {
        let (_dir, path) = create_tmp_source()?;
        let store = EntryStore::open(&path, TableNames::default())?;
        assert_eq!(store.count(CollectionName::Corpus)?, 3);
        Ok(())
    }
}

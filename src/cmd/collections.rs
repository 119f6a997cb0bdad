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

use std::path::Path;

use crate::config::Config;
use crate::error::Fallible;
use crate::store::EntryStore;

pub fn list_collections(source: &Path) -> Fallible<()> {
    let config = Config::for_source(source)?;
    let store = EntryStore::open(source, config.tables)?;
    for line in describe(&store)? {
        println!("{line}");
    }
    Ok(())
}

fn describe(store: &EntryStore) -> Fallible<Vec<String>> {
    let lines = store
        .table_sizes()?
        .into_iter()
        .map(|(name, count)| format!("{name} ({count} words)"))
        .collect();
    Ok(lines)
}

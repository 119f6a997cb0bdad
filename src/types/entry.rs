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

use serde::Deserialize;

pub type EntryId = i64;

/// A vocabulary entry. Entries are never edited; reviewing only moves them
/// between collections.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub term: String,
    pub gloss: String,
    pub example: String,
    pub note: String,
}

impl Entry {
    pub fn new(
        id: EntryId,
        term: impl Into<String>,
        gloss: impl Into<String>,
        example: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id,
            term: term.into(),
            gloss: gloss.into(),
            example: example.into(),
            note: note.into(),
        }
    }
}

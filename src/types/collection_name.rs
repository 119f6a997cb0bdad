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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;

/// The four logical collections a source must expose.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CollectionName {
    /// The full, canonical set of entries. Review actions never touch it.
    Corpus,
    /// Entries still awaiting a decision in the current pass.
    Queue,
    /// Entries marked as known.
    Known,
    /// Entries marked as needing more review.
    New,
}

impl CollectionName {
    pub const ALL: [CollectionName; 4] = [
        CollectionName::Corpus,
        CollectionName::Queue,
        CollectionName::Known,
        CollectionName::New,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Corpus => "corpus",
            CollectionName::Queue => "queue",
            CollectionName::Known => "known",
            CollectionName::New => "new",
        }
    }
}

impl Display for CollectionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_names_match_display() {
        for name in CollectionName::ALL {
            assert_eq!(CollectionName::from_str(name.as_str(), false), Ok(name));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!(CollectionName::from_str("vocabulary", false).is_err());
    }
}

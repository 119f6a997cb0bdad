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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::types::collection_name::CollectionName;

/// The name of the optional config file, looked up next to the source.
pub const CONFIG_FILE_NAME: &str = "vocabdrill.toml";

/// Per-source settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Physical table names for the four collections.
    pub tables: TableNames,
    /// Language tag handed to the pronunciation service.
    pub language: String,
    /// File name of the progress log, relative to the source's directory.
    pub stats_file: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableNames {
    pub corpus: String,
    pub queue: String,
    pub known: String,
    pub new: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables: TableNames::default(),
            language: "fr".to_string(),
            stats_file: "vocab_stats.txt".to_string(),
        }
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            corpus: "vocabulary".to_string(),
            queue: "vocab_exe".to_string(),
            known: "known_vocab".to_string(),
            new: "new_vocab".to_string(),
        }
    }
}

impl TableNames {
    pub fn get(&self, collection: CollectionName) -> &str {
        match collection {
            CollectionName::Corpus => &self.corpus,
            CollectionName::Queue => &self.queue,
            CollectionName::Known => &self.known,
            CollectionName::New => &self.new,
        }
    }
}

impl Config {
    /// Load the config that applies to the given source. If there is no
    /// config file next to it, the defaults are used.
    pub fn for_source(source: &Path) -> Fallible<Self> {
        let path = source_dir(source).join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config file at {}, using defaults.", path.display());
            return Ok(Config::default());
        }
        log::debug!("Loading config from {}", path.display());
        let text = read_to_string(&path)?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }

    /// The path of the progress log for the given source.
    pub fn stats_path(&self, source: &Path) -> PathBuf {
        source_dir(source).join(&self.stats_file)
    }
}

fn source_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults_without_file() -> Fallible<()> {
        let dir = tempdir()?;
        let source = dir.path().join("words.db");
        let config = Config::for_source(&source)?;
        assert_eq!(config, Config::default());
        assert_eq!(config.tables.get(CollectionName::Queue), "vocab_exe");
        assert_eq!(config.stats_path(&source), dir.path().join("vocab_stats.txt"));
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Fallible<()> {
        let dir = tempdir()?;
        let source = dir.path().join("words.db");
        write(
            dir.path().join(CONFIG_FILE_NAME),
            "language = \"de\"\n\n[tables]\nknown = \"bekannt\"\n",
        )?;
        let config = Config::for_source(&source)?;
        assert_eq!(config.language, "de");
        assert_eq!(config.tables.known, "bekannt");
        assert_eq!(config.tables.corpus, "vocabulary");
        assert_eq!(config.stats_file, "vocab_stats.txt");
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() -> Fallible<()> {
        let dir = tempdir()?;
        let source = dir.path().join("words.db");
        write(dir.path().join(CONFIG_FILE_NAME), "colour = \"red\"\n")?;
        assert!(Config::for_source(&source).is_err());
        Ok(())
    }

    #[test]
    fn test_bare_file_name_resolves_to_current_directory() {
        let config = Config::default();
        let path = config.stats_path(Path::new("words.db"));
        assert_eq!(path, PathBuf::from("./vocab_stats.txt"));
    }
}

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

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::config::Config;
use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail_with;
use crate::progress::DailyStats;
use crate::progress::Session;
use crate::selection::ReviewMode;
use crate::selection::Selector;
use crate::store::EntryStore;
use crate::transition;
use crate::types::collection_name::CollectionName;
use crate::types::date::Date;
use crate::types::entry::Entry;
use crate::types::entry::EntryId;

/// The reviewed collection as read from the store, indexed by id. Rebuilt
/// after every mutation.
#[derive(Default)]
struct Snapshot {
    ids: Vec<EntryId>,
    index: HashMap<EntryId, Entry>,
}

impl Snapshot {
    fn read(store: &EntryStore, collection: CollectionName) -> Fallible<Self> {
        let entries = store.load_all(collection)?;
        let ids = entries.iter().map(|e| e.id).collect();
        let index = entries.into_iter().map(|e| (e.id, e)).collect();
        Ok(Self { ids, index })
    }
}

/// What the presentation layer shows for the current entry. The gloss and
/// note are only filled in when the translation is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub id: EntryId,
    pub term: String,
    pub example: String,
    pub gloss: Option<String>,
    pub note: Option<String>,
}

/// Text for the pronunciation service.
#[derive(Debug, Clone, PartialEq)]
pub struct Pronounceable {
    pub text: String,
    pub language: String,
}

/// The review engine as seen by a front-end. Owns the open source, the
/// selection state, the session counters, and the daily stats.
pub struct ReviewController<R: Rng = ThreadRng> {
    store: EntryStore,
    selector: Selector<R>,
    session: Session,
    stats: DailyStats,
    stats_path: PathBuf,
    language: String,
    collection: CollectionName,
    snapshot: Snapshot,
    translation_visible: bool,
    revealed: bool,
}

impl ReviewController<ThreadRng> {
    /// Open a source using the config file next to it, if any.
    pub fn open(source: &Path, mode: ReviewMode) -> Fallible<Self> {
        let config = Config::for_source(source)?;
        Self::open_with(source, &config, Selector::new(mode))
    }
}

impl<R: Rng> ReviewController<R> {
    pub fn open_with(source: &Path, config: &Config, selector: Selector<R>) -> Fallible<Self> {
        let store = EntryStore::open(source, config.tables.clone())?;
        let stats_path = config.stats_path(source);
        let stats = DailyStats::load(&stats_path)?;
        Self::new(store, selector, stats, stats_path, config.language.clone())
    }

    pub fn new(
        store: EntryStore,
        selector: Selector<R>,
        stats: DailyStats,
        stats_path: PathBuf,
        language: String,
    ) -> Fallible<Self> {
        let mut controller = Self {
            store,
            selector,
            session: Session::new(),
            stats,
            stats_path,
            language,
            collection: CollectionName::Queue,
            snapshot: Snapshot::default(),
            translation_visible: false,
            revealed: false,
        };
        controller.reload()?;
        let ids = controller.snapshot.ids.clone();
        controller.selector.reset(&ids);
        log::debug!(
            "Loaded queue with {} entries in {} mode.",
            ids.len(),
            controller.selector.mode()
        );
        Ok(controller)
    }

    /// The entry on display, or `None` when the reviewed collection is empty.
    pub fn current_entry(&self) -> Option<&Entry> {
        let id = self.selector.current()?;
        let entry = self.snapshot.index.get(&id);
        if entry.is_none() {
            log::warn!("Current id {id} is not in the {} snapshot.", self.collection);
        }
        entry
    }

    pub fn current_view(&self) -> Option<EntryView> {
        let entry = self.current_entry()?;
        let show = self.translation_visible || self.revealed;
        Some(EntryView {
            id: entry.id,
            term: entry.term.clone(),
            example: entry.example.clone(),
            gloss: show.then(|| entry.gloss.clone()),
            note: show.then(|| entry.note.clone()),
        })
    }

    /// Mark the current entry as known and move on. Returns false when there
    /// was nothing to mark.
    pub fn on_mark_known(&mut self) -> Fallible<bool> {
        self.decide(transition::Outcome::Known)
    }

    /// Mark the current entry as needing review and move on. Returns false
    /// when there was nothing to mark.
    pub fn on_mark_new(&mut self) -> Fallible<bool> {
        self.decide(transition::Outcome::New)
    }

    fn decide(&mut self, outcome: transition::Outcome) -> Fallible<bool> {
        if !self.store.is_open() {
            return fail_with(ErrorKind::StoreUnavailable, "no source is open");
        }
        let Some(entry) = self.current_entry().cloned() else {
            log::debug!("Nothing to mark: {} is empty.", self.collection);
            return Ok(false);
        };
        transition::apply(&self.store, &mut self.session, &entry, outcome)?;
        self.reload()?;
        self.advance();
        self.save_progress()?;
        Ok(true)
    }

    /// Show or hide the translation for every entry.
    pub fn on_toggle_translation_visible(&mut self) -> bool {
        self.translation_visible = !self.translation_visible;
        self.translation_visible
    }

    /// Show the translation for the current entry only.
    pub fn on_reveal_translation(&mut self) {
        self.revealed = true;
    }

    /// Move on without deciding.
    pub fn on_next(&mut self) -> Fallible<Option<EntryId>> {
        self.reload()?;
        Ok(self.advance())
    }

    /// Switch modes. Also advances to the next entry.
    pub fn on_set_mode(&mut self, mode: ReviewMode) -> Fallible<Option<EntryId>> {
        self.reload()?;
        self.revealed = false;
        let next = self.selector.set_mode(mode, &self.snapshot.ids);
        log::debug!("Switched to {mode} mode.");
        Ok(next)
    }

    /// Review a different collection, starting from its smallest id. Marking
    /// moves entries between collections exactly as it does from the queue.
    pub fn on_select_collection(
        &mut self,
        collection: CollectionName,
    ) -> Fallible<Option<EntryId>> {
        self.collection = collection;
        self.reload()?;
        self.revealed = false;
        let first = self.selector.reset(&self.snapshot.ids);
        log::debug!(
            "Reviewing {collection} with {} entries.",
            self.snapshot.ids.len()
        );
        Ok(first)
    }

    /// Rebuild the queue from the corpus and start a new session.
    pub fn on_refresh(&mut self) -> Fallible<usize> {
        let size = transition::rebuild_queue(&self.store, &mut self.session)?;
        self.reload()?;
        self.revealed = false;
        self.selector.reset(&self.snapshot.ids);
        self.save_progress()?;
        Ok(size)
    }

    pub fn on_clear_known(&mut self) -> Fallible<usize> {
        transition::clear_known(&self.store)
    }

    pub fn on_clear_new(&mut self) -> Fallible<usize> {
        transition::clear_new(&self.store)
    }

    pub fn daily_stats(&self) -> &DailyStats {
        &self.stats
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The collection being reviewed.
    pub fn collection(&self) -> CollectionName {
        self.collection
    }

    pub fn mode(&self) -> ReviewMode {
        self.selector.mode()
    }

    pub fn translation_visible(&self) -> bool {
        self.translation_visible
    }

    pub fn collection_counts(&self) -> Fallible<Vec<(CollectionName, usize)>> {
        let mut counts = Vec::new();
        for collection in CollectionName::ALL {
            counts.push((collection, self.store.count(collection)?));
        }
        Ok(counts)
    }

    pub fn pronounceable_term(&self) -> Option<Pronounceable> {
        let entry = self.current_entry()?;
        Some(Pronounceable {
            text: entry.term.clone(),
            language: self.language.clone(),
        })
    }

    /// The example sentence of the current entry, if it has one.
    pub fn pronounceable_example(&self) -> Option<Pronounceable> {
        let entry = self.current_entry()?;
        if entry.example.trim().is_empty() {
            return None;
        }
        Some(Pronounceable {
            text: entry.example.clone(),
            language: self.language.clone(),
        })
    }

    /// Close the source. Every later store operation fails with
    /// `StoreUnavailable`.
    pub fn close(&mut self) {
        self.store.close();
        self.snapshot = Snapshot::default();
    }

    fn reload(&mut self) -> Fallible<()> {
        self.snapshot = Snapshot::read(&self.store, self.collection)?;
        Ok(())
    }

    fn advance(&mut self) -> Option<EntryId> {
        self.revealed = false;
        self.selector.next(&self.snapshot.ids)
    }

    fn save_progress(&mut self) -> Fallible<()> {
        self.stats.snapshot_today(Date::today(), &self.session);
        self.stats.persist(&self.stats_path)
    }
}

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

//! The operations that move entries between collections. `mark_known` and
//! `mark_new` are the only code that adds entries to Known or New.

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::progress::Session;
use crate::store::EntryStore;
use crate::types::collection_name::CollectionName;
use crate::types::entry::Entry;
use crate::types::transition_step::TransitionStep;

/// The user's decision about an entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Known,
    New,
}

impl Outcome {
    /// The collection the entry ends up in.
    fn target(self) -> CollectionName {
        match self {
            Outcome::Known => CollectionName::Known,
            Outcome::New => CollectionName::New,
        }
    }

    fn opposite(self) -> CollectionName {
        match self {
            Outcome::Known => CollectionName::New,
            Outcome::New => CollectionName::Known,
        }
    }

    /// The store calls, in order.
    fn steps(self) -> [TransitionStep; 3] {
        [
            TransitionStep::Delete(self.opposite()),
            TransitionStep::Delete(CollectionName::Queue),
            TransitionStep::Insert(self.target()),
        ]
    }
}

pub fn mark_known(store: &EntryStore, session: &mut Session, entry: &Entry) -> Fallible<()> {
    apply(store, session, entry, Outcome::Known)
}

pub fn mark_new(store: &EntryStore, session: &mut Session, entry: &Entry) -> Fallible<()> {
    apply(store, session, entry, Outcome::New)
}

/// Run the three store calls for a decision. The session is only updated
/// once all of them have succeeded.
pub fn apply(
    store: &EntryStore,
    session: &mut Session,
    entry: &Entry,
    outcome: Outcome,
) -> Fallible<()> {
    if !store.is_open() {
        return Err(ErrorReport::with_kind(
            ErrorKind::StoreUnavailable,
            "no source is open",
        ));
    }
    let mut mutated: Vec<CollectionName> = Vec::new();
    for step in outcome.steps() {
        let result = match step {
            TransitionStep::Delete(collection) => store.delete_by_id(collection, entry.id),
            TransitionStep::Insert(collection) => store.insert_if_absent(collection, entry),
        };
        match result {
            Ok(true) => mutated.push(step.collection()),
            Ok(false) => {}
            Err(e) => {
                log::error!(
                    "Transition of entry {} failed at `{step}` (mutated: {mutated:?}): {e}",
                    entry.id
                );
                return Err(ErrorReport::with_kind(
                    ErrorKind::TransitionFailed { step, mutated },
                    format!("failed to {step} for entry {}: {}", entry.id, e.message()),
                ));
            }
        }
    }
    session.record_outcome(entry.id, outcome == Outcome::Known);
    log::debug!("Entry {} marked {:?}.", entry.id, outcome);
    Ok(())
}

/// Refill the queue with every corpus entry not yet decided, and start a
/// new session. Returns the queue size.
pub fn rebuild_queue(store: &EntryStore, session: &mut Session) -> Fallible<usize> {
    let size = store.rebuild_queue()?;
    session.reset();
    Ok(size)
}

/// Empty Known. The cleared entries only return to the queue on the next
/// rebuild.
pub fn clear_known(store: &EntryStore) -> Fallible<usize> {
    store.clear(CollectionName::Known)
}

/// Empty New. The cleared entries only return to the queue on the next
/// rebuild.
pub fn clear_new(store: &EntryStore) -> Fallible<usize> {
    store.clear(CollectionName::New)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::sample_entries;
    use crate::helper::seeded_store;
    use crate::types::entry::EntryId;

    fn ids(store: &EntryStore, collection: CollectionName) -> Fallible<Vec<EntryId>> {
        store.ids(collection)
    }

    #[test]
    fn test_mark_known() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        rebuild_queue(&store, &mut session)?;
        let entry = &sample_entries()[0];
        store.insert_if_absent(CollectionName::New, entry)?;
        mark_known(&store, &mut session, entry)?;
        assert!(store.exists(CollectionName::Known, 1)?);
        assert!(!store.exists(CollectionName::New, 1)?);
        assert!(!store.exists(CollectionName::Queue, 1)?);
        assert!(store.exists(CollectionName::Corpus, 1)?);
        assert_eq!(session.reviewed(), 1);
        assert!(session.known_ids().contains(&1));
        Ok(())
    }

    #[test]
    fn test_mark_new() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        rebuild_queue(&store, &mut session)?;
        let entry = &sample_entries()[1];
        mark_known(&store, &mut session, entry)?;
        mark_new(&store, &mut session, entry)?;
        assert!(!store.exists(CollectionName::Known, 2)?);
        assert!(!store.exists(CollectionName::Queue, 2)?);
        assert!(store.exists(CollectionName::New, 2)?);
        assert_eq!(session.reviewed(), 2);
        assert_eq!(session.known_count(), 0);
        assert_eq!(session.unknown_count(), 1);
        Ok(())
    }

    #[test]
    fn test_marking_twice_keeps_one_copy() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        let entry = &sample_entries()[2];
        mark_new(&store, &mut session, entry)?;
        mark_new(&store, &mut session, entry)?;
        assert_eq!(store.count(CollectionName::New)?, 1);
        assert_eq!(session.reviewed(), 2);
        assert_eq!(session.unknown_count(), 1);
        Ok(())
    }

    #[test]
    fn test_scenario() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        let entries = sample_entries();
        assert_eq!(rebuild_queue(&store, &mut session)?, 3);
        assert_eq!(ids(&store, CollectionName::Queue)?, vec![1, 2, 3]);
        mark_known(&store, &mut session, &entries[0])?;
        assert_eq!(ids(&store, CollectionName::Known)?, vec![1]);
        assert_eq!(ids(&store, CollectionName::Queue)?, vec![2, 3]);
        mark_new(&store, &mut session, &entries[2])?;
        assert_eq!(ids(&store, CollectionName::New)?, vec![3]);
        assert_eq!(ids(&store, CollectionName::Queue)?, vec![2]);
        Ok(())
    }

    #[test]
    fn test_rebuild_is_idempotent_and_resets_session() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        let entries = sample_entries();
        rebuild_queue(&store, &mut session)?;
        mark_known(&store, &mut session, &entries[1])?;
        rebuild_queue(&store, &mut session)?;
        let first = ids(&store, CollectionName::Queue)?;
        assert_eq!(session, Session::new());
        rebuild_queue(&store, &mut session)?;
        let second = ids(&store, CollectionName::Queue)?;
        assert_eq!(first, vec![1, 3]);
        assert_eq!(first, second);
        assert_eq!(session, Session::new());
        Ok(())
    }

    #[test]
    fn test_clear_known_does_not_readmit() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        let entries = sample_entries();
        rebuild_queue(&store, &mut session)?;
        mark_known(&store, &mut session, &entries[0])?;
        mark_new(&store, &mut session, &entries[1])?;
        let queue_before = store.count(CollectionName::Queue)?;
        let new_before = store.count(CollectionName::New)?;
        assert_eq!(clear_known(&store)?, 1);
        assert_eq!(store.count(CollectionName::Known)?, 0);
        assert_eq!(store.count(CollectionName::Queue)?, queue_before);
        assert_eq!(store.count(CollectionName::New)?, new_before);
        rebuild_queue(&store, &mut session)?;
        assert_eq!(ids(&store, CollectionName::Queue)?, vec![1, 3]);
        Ok(())
    }

    #[test]
    fn test_clear_new() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        let entries = sample_entries();
        mark_new(&store, &mut session, &entries[0])?;
        mark_new(&store, &mut session, &entries[1])?;
        assert_eq!(clear_new(&store)?, 2);
        assert_eq!(store.count(CollectionName::New)?, 0);
        assert_eq!(store.count(CollectionName::Corpus)?, 3);
        Ok(())
    }

    #[test]
    fn test_partial_failure_reports_mutations() -> Fallible<()> {
        let store = seeded_store()?;
        let mut session = Session::new();
        let entry = &sample_entries()[0];
        rebuild_queue(&store, &mut session)?;
        store.insert_if_absent(CollectionName::New, entry)?;
        store.execute_raw("drop table known_vocab;")?;
        let err = mark_known(&store, &mut session, entry).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::TransitionFailed {
                step: TransitionStep::Insert(CollectionName::Known),
                mutated: vec![CollectionName::New, CollectionName::Queue],
            }
        );
        assert_eq!(session.reviewed(), 0);
        Ok(())
    }

    #[test]
    fn test_closed_store_refuses_transitions() -> Fallible<()> {
        let mut store = seeded_store()?;
        store.close();
        let mut session = Session::new();
        let err = mark_known(&store, &mut session, &sample_entries()[0]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreUnavailable);
        let err = rebuild_queue(&store, &mut session).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreUnavailable);
        Ok(())
    }
}

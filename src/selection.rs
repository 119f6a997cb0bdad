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
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;

use crate::types::entry::EntryId;

/// How the next entry is chosen.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReviewMode {
    /// In ascending id order, wrapping around at the end.
    Sequential,
    /// Uniformly at random. The same entry may come up twice in a row.
    Random,
}

impl ReviewMode {
    pub fn toggled(self) -> Self {
        match self {
            ReviewMode::Sequential => ReviewMode::Random,
            ReviewMode::Random => ReviewMode::Sequential,
        }
    }
}

impl Display for ReviewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewMode::Sequential => write!(f, "sequential"),
            ReviewMode::Random => write!(f, "random"),
        }
    }
}

/// Tracks the entry on display and picks the next one from a snapshot of
/// the queue's ids. Holds no entries itself.
pub struct Selector<R: Rng = ThreadRng> {
    mode: ReviewMode,
    current: Option<EntryId>,
    rng: R,
}

impl Selector<ThreadRng> {
    pub fn new(mode: ReviewMode) -> Self {
        Self::with_rng(mode, rand::rng())
    }
}

impl<R: Rng> Selector<R> {
    pub fn with_rng(mode: ReviewMode, rng: R) -> Self {
        Self {
            mode,
            current: None,
            rng,
        }
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    /// The id on display, or `None` when the queue is empty.
    pub fn current(&self) -> Option<EntryId> {
        self.current
    }

    /// Point at the first id of a freshly loaded queue.
    pub fn reset(&mut self, queue_ids: &[EntryId]) -> Option<EntryId> {
        self.current = queue_ids.iter().min().copied();
        self.current
    }

    /// Advance to the next id. `queue_ids` must be read from the store after
    /// the last mutation; its order does not matter.
    pub fn next(&mut self, queue_ids: &[EntryId]) -> Option<EntryId> {
        self.current = match self.mode {
            ReviewMode::Sequential => next_sequential(self.current, queue_ids),
            ReviewMode::Random => queue_ids.choose(&mut self.rng).copied(),
        };
        self.current
    }

    /// Change the mode. This also advances to the next entry.
    pub fn set_mode(&mut self, mode: ReviewMode, queue_ids: &[EntryId]) -> Option<EntryId> {
        self.mode = mode;
        self.next(queue_ids)
    }
}

/// The smallest id strictly greater than `current`, wrapping to the
/// smallest id overall. A `current` that is not in the queue is not special:
/// this is how marking the displayed entry moves on to the following one.
pub fn next_sequential(current: Option<EntryId>, queue_ids: &[EntryId]) -> Option<EntryId> {
    let min = queue_ids.iter().min().copied()?;
    let Some(current) = current else {
        return Some(min);
    };
    let following = queue_ids.iter().filter(|id| **id > current).min().copied();
    Some(following.unwrap_or(min))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn seeded(mode: ReviewMode) -> Selector<StdRng> {
        Selector::with_rng(mode, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_empty_queue() {
        let mut selector = seeded(ReviewMode::Sequential);
        selector.reset(&[1, 2]);
        assert_eq!(selector.next(&[]), None);
        assert_eq!(selector.current(), None);
        let mut selector = seeded(ReviewMode::Random);
        assert_eq!(selector.next(&[]), None);
    }

    #[test]
    fn test_sequential_wraps() {
        let mut selector = seeded(ReviewMode::Sequential);
        let queue = [5, 1, 3];
        assert_eq!(selector.reset(&queue), Some(1));
        assert_eq!(selector.next(&queue), Some(3));
        assert_eq!(selector.next(&queue), Some(5));
        assert_eq!(selector.next(&queue), Some(1));
    }

    #[test]
    fn test_sequential_visits_everything_once_per_pass() {
        let mut selector = seeded(ReviewMode::Sequential);
        let queue: Vec<EntryId> = vec![10, 4, 7, 1, 99, 23];
        selector.reset(&queue);
        let mut seen = HashSet::new();
        seen.insert(selector.current().unwrap());
        for _ in 1..queue.len() {
            let id = selector.next(&queue).unwrap();
            assert!(seen.insert(id), "{id} repeated before a full pass");
        }
        assert_eq!(seen.len(), queue.len());
        assert_eq!(selector.next(&queue), Some(1));
    }

    #[test]
    fn test_sequential_from_removed_id() {
        assert_eq!(next_sequential(Some(1), &[2, 3]), Some(2));
        assert_eq!(next_sequential(Some(2), &[2]), Some(2));
        assert_eq!(next_sequential(Some(3), &[1, 2]), Some(1));
        assert_eq!(next_sequential(None, &[8, 4]), Some(4));
        assert_eq!(next_sequential(Some(4), &[]), None);
    }

    #[test]
    fn test_random_stays_in_queue() {
        let mut selector = seeded(ReviewMode::Random);
        let queue = [2, 4, 6];
        for _ in 0..200 {
            let id = selector.next(&queue).unwrap();
            assert!(queue.contains(&id));
        }
    }

    #[test]
    fn test_random_reaches_every_id() {
        let mut selector = seeded(ReviewMode::Random);
        let queue = [1, 2, 3];
        let seen: HashSet<EntryId> = (0..300).filter_map(|_| selector.next(&queue)).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_set_mode_advances() {
        let mut selector = seeded(ReviewMode::Random);
        let queue = [1, 2, 3];
        selector.reset(&queue);
        assert_eq!(selector.set_mode(ReviewMode::Sequential, &queue), Some(2));
        assert_eq!(selector.mode(), ReviewMode::Sequential);
    }

    #[test]
    fn test_toggled() {
        assert_eq!(ReviewMode::Sequential.toggled(), ReviewMode::Random);
        assert_eq!(ReviewMode::Random.toggled(), ReviewMode::Sequential);
    }
}

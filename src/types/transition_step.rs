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

use crate::types::collection_name::CollectionName;

/// One of the store calls that make up a mark-known or mark-new transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionStep {
    Delete(CollectionName),
    Insert(CollectionName),
}

impl TransitionStep {
    pub fn collection(&self) -> CollectionName {
        match self {
            TransitionStep::Delete(c) => *c,
            TransitionStep::Insert(c) => *c,
        }
    }
}

impl Display for TransitionStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionStep::Delete(c) => write!(f, "delete from {c}"),
            TransitionStep::Insert(c) => write!(f, "insert into {c}"),
        }
    }
}

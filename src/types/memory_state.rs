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

use serde::Serialize;

use crate::types::timestamp::Timestamp;

/// The easiness every new card starts with.
pub const INITIAL_EASINESS: f64 = 2.5;

/// Easiness is never allowed to fall below this.
pub const MIN_EASINESS: f64 = 1.3;

/// Represents the memory strength of a card: everything the scheduler needs
/// to decide when the card is due next.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMemoryState {
    /// Inverse difficulty. Higher means intervals grow faster.
    pub easiness: f64,
    /// Number of consecutive correct ratings since the last reset.
    pub consecutive_correct: u32,
    /// The earliest instant the card should be shown again.
    pub next_due_date: Timestamp,
}

impl CardMemoryState {
    /// The state of a card that has never been reviewed. It is due
    /// immediately.
    pub fn fresh(now: Timestamp) -> Self {
        Self {
            easiness: INITIAL_EASINESS,
            consecutive_correct: 0,
            next_due_date: now,
        }
    }

    pub fn is_due_by(&self, cutoff: Timestamp) -> bool {
        self.next_due_date <= cutoff
    }
}

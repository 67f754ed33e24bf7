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

use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::ids::Owner;
use crate::types::memory_state::CardMemoryState;
use crate::types::timestamp::Timestamp;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub owner: Owner,
    pub deck_id: DeckId,
    pub question: String,
    pub answer: String,
    pub created_at: Timestamp,
    /// When the card was last rated. Equal to `created_at` until then.
    pub last_shown_at: Timestamp,
    #[serde(flatten)]
    pub memory: CardMemoryState,
}

impl Card {
    pub fn belongs_to(&self, owner: &Owner, deck_id: DeckId) -> bool {
        &self.owner == owner && self.deck_id == deck_id
    }
}

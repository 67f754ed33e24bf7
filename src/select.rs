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

use crate::types::card::Card;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::ids::Owner;
use crate::types::timestamp::Timestamp;

/// Find the cards in an owner's deck that are due within `horizon_days` of
/// `now`. A horizon of zero means strictly due now. The result preserves the
/// order of `cards`.
pub fn select_due<'a>(
    cards: impl IntoIterator<Item = &'a Card>,
    owner: &Owner,
    deck_id: DeckId,
    horizon_days: i64,
    now: Timestamp,
) -> Vec<CardId> {
    let cutoff = now.saturating_add_days(horizon_days);
    cards
        .into_iter()
        .filter(|card| card.belongs_to(owner, deck_id))
        .filter(|card| card.memory.is_due_by(cutoff))
        .map(|card| card.id)
        .collect()
}

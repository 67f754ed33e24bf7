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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::study::StudyBatch;
use crate::study::study_batch;
use crate::types::card::Card;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::timestamp::Timestamp;

/// Add a card to the deck named `deck_name`, creating the deck if needed.
pub fn add_card(
    collection: &mut Collection,
    deck_name: &str,
    question: &str,
    answer: &str,
    now: Timestamp,
) -> Fallible<Card> {
    let owner = collection.owner.clone();
    let (deck, card) = collection
        .db
        .create_card(&owner, deck_name, question.trim(), answer.trim(), now)?;
    log::info!("Added card {} to deck '{}'.", card.id, deck.name);
    Ok(card)
}

/// List the cards in a deck. With `days`, only those due within that many
/// days.
pub fn list_cards(
    collection: &Collection,
    deck_id: DeckId,
    days: Option<i64>,
    now: Timestamp,
) -> Fallible<Vec<Card>> {
    let owner = &collection.owner;
    collection.db.get_deck(owner, deck_id)?;
    match days {
        Some(days) => collection.db.cards_to_study(owner, deck_id, days, now),
        None => collection.db.list_cards(owner, deck_id),
    }
}

pub fn show_card(collection: &Collection, deck_id: DeckId, card_id: CardId) -> Fallible<Card> {
    collection.db.get_card(&collection.owner, deck_id, card_id)
}

/// A random batch of cards due within `days` (or the configured horizon),
/// capped at the configured card limit.
pub fn due_batch(
    collection: &Collection,
    deck_id: DeckId,
    days: Option<i64>,
    now: Timestamp,
) -> Fallible<StudyBatch> {
    let days = days.unwrap_or(collection.config.horizon_days);
    let owner = &collection.owner;
    collection.db.get_deck(owner, deck_id)?;
    let due = collection.db.cards_to_study(owner, deck_id, days, now)?;
    Ok(study_batch(
        due,
        collection.config.card_limit,
        &mut rand::thread_rng(),
    ))
}

pub fn rate_card(
    collection: &mut Collection,
    card_id: CardId,
    rating: i64,
    now: Timestamp,
) -> Fallible<Card> {
    let owner = collection.owner.clone();
    collection.db.rate_card(&owner, card_id, rating, now)
}

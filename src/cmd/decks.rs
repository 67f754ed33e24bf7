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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::deck::Deck;
use crate::types::ids::DeckId;
use crate::types::timestamp::Timestamp;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    #[serde(flatten)]
    pub deck: Deck,
    pub due_count: usize,
}

/// List the owner's decks with the number of cards due in each.
pub fn list_decks(
    collection: &Collection,
    name: Option<&str>,
    now: Timestamp,
) -> Fallible<Vec<DeckSummary>> {
    let decks = collection.db.list_decks(&collection.owner, name)?;
    let mut summaries = Vec::with_capacity(decks.len());
    for deck in decks {
        let due_count = collection.db.due_count(&collection.owner, deck.id, now)?;
        summaries.push(DeckSummary { deck, due_count });
    }
    Ok(summaries)
}

pub fn new_deck(collection: &mut Collection, name: &str, description: &str) -> Fallible<Deck> {
    let owner = collection.owner.clone();
    let deck = collection.db.create_deck(&owner, name, description)?;
    log::info!("Created deck '{}' with id {}.", deck.name, deck.id);
    Ok(deck)
}

pub fn delete_deck(collection: &mut Collection, deck_id: DeckId) -> Fallible<()> {
    let owner = collection.owner.clone();
    collection.db.delete_deck(&owner, deck_id)?;
    log::info!("Deleted deck {deck_id}.");
    Ok(())
}

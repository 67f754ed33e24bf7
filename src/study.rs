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

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::types::card::Card;

/// A random selection of due cards to present in one sitting.
#[derive(Debug, Serialize)]
pub struct StudyBatch {
    /// How many cards were due in total.
    pub count: usize,
    /// At most `limit` of them, in random order.
    pub cards: Vec<Card>,
}

/// Draw up to `limit` cards at random from `due`.
pub fn study_batch<R: Rng + ?Sized>(due: Vec<Card>, limit: usize, rng: &mut R) -> StudyBatch {
    let count = due.len();
    let cards: Vec<Card> = due.choose_multiple(rng, limit.min(count)).cloned().collect();
    log::debug!("Drew {} of {} due cards.", cards.len(), count);
    StudyBatch { count, cards }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::ids::CardId;
    use crate::types::ids::DeckId;
    use crate::types::ids::Owner;
    use crate::types::memory_state::CardMemoryState;
    use crate::types::timestamp::Timestamp;

    fn cards(n: i64) -> Vec<Card> {
        let now = Timestamp::now();
        (1..=n)
            .map(|id| Card {
                id: CardId::new(id),
                owner: Owner::new("u"),
                deck_id: DeckId::new(1),
                question: String::new(),
                answer: String::new(),
                created_at: now,
                last_shown_at: now,
                memory: CardMemoryState::fresh(now),
            })
            .collect()
    }

    #[test]
    fn test_caps_at_limit() {
        let mut rng = StdRng::seed_from_u64(42);
        let batch = study_batch(cards(12), 5, &mut rng);
        assert_eq!(batch.count, 12);
        assert_eq!(batch.cards.len(), 5);
        let ids: HashSet<CardId> = batch.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_fewer_than_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = study_batch(cards(3), 5, &mut rng);
        assert_eq!(batch.count, 3);
        let ids: HashSet<CardId> = batch.cards.iter().map(|c| c.id).collect();
        let expected: HashSet<CardId> = (1..=3).map(CardId::new).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_nothing_due() {
        let mut rng = StdRng::seed_from_u64(0);
        let batch = study_batch(Vec::new(), 5, &mut rng);
        assert_eq!(batch.count, 0);
        assert!(batch.cards.is_empty());
    }
}

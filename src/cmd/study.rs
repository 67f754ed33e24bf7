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

use std::io::BufRead;
use std::io::Write;

use rand::Rng;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::study::study_batch;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Cards due when the session started.
    pub due_count: usize,
    /// Cards rated during the session.
    pub rated_count: usize,
}

enum Prompt {
    Rated(i64),
    Quit,
}

/// Run an interactive study session over a random batch of the deck's due
/// cards. Ratings are saved together when the batch is finished, or when the
/// user quits or input ends.
pub fn study<R, W, G>(
    collection: &mut Collection,
    deck_id: DeckId,
    input: &mut R,
    output: &mut W,
    rng: &mut G,
    now: Timestamp,
) -> Fallible<SessionSummary>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let owner = collection.owner.clone();
    let deck = collection.db.get_deck(&owner, deck_id)?;
    let due = collection.db.cards_to_study(&owner, deck_id, 0, now)?;
    let batch = study_batch(due, collection.config.card_limit, rng);
    if batch.cards.is_empty() {
        writeln!(output, "No cards due in '{}'.", deck.name)?;
        return Ok(SessionSummary {
            due_count: 0,
            rated_count: 0,
        });
    }
    writeln!(
        output,
        "Studying {} of {} due cards in '{}'.",
        batch.cards.len(),
        batch.count,
        deck.name
    )?;

    let mut ratings: Vec<(CardId, i64)> = Vec::new();
    for card in &batch.cards {
        writeln!(output)?;
        writeln!(output, "Q: {}", card.question)?;
        writeln!(output, "[press Enter to reveal]")?;
        if read_line(input)?.is_none() {
            break;
        }
        writeln!(output, "A: {}", card.answer)?;
        match read_rating(input, output)? {
            Prompt::Rated(rating) => ratings.push((card.id, rating)),
            Prompt::Quit => break,
        }
    }

    if !ratings.is_empty() {
        collection.db.rate_cards(&owner, &ratings, now)?;
    }
    log::debug!("Session completed");
    writeln!(output)?;
    writeln!(output, "Rated {} of {} cards.", ratings.len(), batch.cards.len())?;
    Ok(SessionSummary {
        due_count: batch.count,
        rated_count: ratings.len(),
    })
}

fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn read_rating<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Fallible<Prompt> {
    loop {
        writeln!(
            output,
            "Rating: (0 = blank ... 5 = perfect, q = quit)"
        )?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(Prompt::Quit),
        };
        if line == "q" {
            return Ok(Prompt::Quit);
        }
        match line.parse::<i64>() {
            Ok(rating) if Rating::try_from(rating).is_ok() => return Ok(Prompt::Rated(rating)),
            _ => writeln!(
                output,
                "Invalid input. Please enter a number between {} and {}.",
                Rating::MIN,
                Rating::MAX
            )?,
        }
    }
}

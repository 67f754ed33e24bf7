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

use std::collections::HashSet;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::compute_next_state;
use crate::select::select_due;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::ids::Owner;
use crate::types::memory_state::CardMemoryState;
use crate::types::timestamp::Timestamp;

const CARD_COLUMNS: &str = "card_id, owner, deck_id, question, answer, created_at, last_shown_at, easiness, consecutive_correct, next_due_date";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Create a new deck. Fails if the owner already has a deck with this
    /// name.
    pub fn create_deck(&mut self, owner: &Owner, name: &str, description: &str) -> Fallible<Deck> {
        let tx = self.conn.transaction()?;
        if find_deck_by_name(&tx, owner, name)?.is_some() {
            return fail(format!("a deck named '{name}' already exists."));
        }
        let deck = insert_deck(&tx, owner, name, description)?;
        tx.commit()?;
        Ok(deck)
    }

    /// Find a deck by name, creating it if it does not exist.
    pub fn get_or_create_deck(&mut self, owner: &Owner, name: &str) -> Fallible<Deck> {
        let tx = self.conn.transaction()?;
        let deck = get_or_create_deck(&tx, owner, name)?;
        tx.commit()?;
        Ok(deck)
    }

    /// List an owner's decks, optionally only those with the given name.
    pub fn list_decks(&self, owner: &Owner, name: Option<&str>) -> Fallible<Vec<Deck>> {
        let mut stmt = self.conn.prepare(
            "select deck_id, owner, name, description from decks where owner = ?1 and (?2 is null or name = ?2) order by deck_id;",
        )?;
        let decks = stmt
            .query_map((owner, name), deck_from_row)?
            .collect::<rusqlite::Result<Vec<Deck>>>()?;
        Ok(decks)
    }

    /// Get one of the owner's decks. Fails if there is no such deck.
    pub fn get_deck(&self, owner: &Owner, deck_id: DeckId) -> Fallible<Deck> {
        match fetch_deck(&self.conn, owner, deck_id)? {
            Some(deck) => Ok(deck),
            None => fail(format!("no deck with id {deck_id}.")),
        }
    }

    /// Delete a deck and all of its cards.
    pub fn delete_deck(&mut self, owner: &Owner, deck_id: DeckId) -> Fallible<()> {
        let deleted = self.conn.execute(
            "delete from decks where deck_id = ? and owner = ?;",
            (deck_id, owner),
        )?;
        if deleted == 0 {
            return fail(format!("no deck with id {deck_id}."));
        }
        log::debug!("Deleted deck {deck_id}.");
        Ok(())
    }

    /// Create a card in the deck with the given name. The deck is created if
    /// it does not exist yet.
    pub fn create_card(
        &mut self,
        owner: &Owner,
        deck_name: &str,
        question: &str,
        answer: &str,
        now: Timestamp,
    ) -> Fallible<(Deck, Card)> {
        let tx = self.conn.transaction()?;
        let deck = get_or_create_deck(&tx, owner, deck_name)?;
        let card = insert_card(&tx, owner, deck.id, question, answer, now)?;
        tx.commit()?;
        Ok((deck, card))
    }

    /// Create a card in an existing deck.
    pub fn add_card(
        &mut self,
        owner: &Owner,
        deck_id: DeckId,
        question: &str,
        answer: &str,
        now: Timestamp,
    ) -> Fallible<Card> {
        let tx = self.conn.transaction()?;
        if fetch_deck(&tx, owner, deck_id)?.is_none() {
            return fail(format!("no deck with id {deck_id}."));
        }
        let card = insert_card(&tx, owner, deck_id, question, answer, now)?;
        tx.commit()?;
        Ok(card)
    }

    /// All the cards in one of the owner's decks.
    pub fn list_cards(&self, owner: &Owner, deck_id: DeckId) -> Fallible<Vec<Card>> {
        let sql = format!(
            "select {CARD_COLUMNS} from cards where deck_id = ? and owner = ? order by card_id;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let cards = stmt
            .query_map((deck_id, owner), card_from_row)?
            .collect::<rusqlite::Result<Vec<Card>>>()?;
        Ok(cards)
    }

    /// Get a single card. Fails if the card is not in the given deck.
    pub fn get_card(&self, owner: &Owner, deck_id: DeckId, card_id: CardId) -> Fallible<Card> {
        match fetch_card(&self.conn, owner, card_id)? {
            Some(card) if card.deck_id == deck_id => Ok(card),
            _ => fail(format!("no card with id {card_id} in deck {deck_id}.")),
        }
    }

    /// The cards in a deck due within `horizon_days` of `now`.
    pub fn cards_to_study(
        &self,
        owner: &Owner,
        deck_id: DeckId,
        horizon_days: i64,
        now: Timestamp,
    ) -> Fallible<Vec<Card>> {
        let cards = self.list_cards(owner, deck_id)?;
        let due: HashSet<CardId> = select_due(&cards, owner, deck_id, horizon_days, now)
            .into_iter()
            .collect();
        let cards: Vec<Card> = cards
            .into_iter()
            .filter(|card| due.contains(&card.id))
            .collect();
        Ok(cards)
    }

    /// The number of cards in a deck that are due right now.
    pub fn due_count(&self, owner: &Owner, deck_id: DeckId, now: Timestamp) -> Fallible<usize> {
        Ok(self.cards_to_study(owner, deck_id, 0, now)?.len())
    }

    /// Record a single rating. See [`Database::rate_cards`].
    pub fn rate_card(
        &mut self,
        owner: &Owner,
        card_id: CardId,
        rating: i64,
        now: Timestamp,
    ) -> Fallible<Card> {
        let mut cards = self.rate_cards(owner, &[(card_id, rating)], now)?;
        match cards.pop() {
            Some(card) => Ok(card),
            None => fail("no card was rated."),
        }
    }

    /// Apply a batch of ratings, returning the updated cards.
    ///
    /// The batch runs in a single immediate transaction: the write lock is
    /// taken before any card state is read, and if any rating fails, none
    /// are saved.
    pub fn rate_cards(
        &mut self,
        owner: &Owner,
        ratings: &[(CardId, i64)],
        now: Timestamp,
    ) -> Fallible<Vec<Card>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut updated = Vec::with_capacity(ratings.len());
        for &(card_id, rating) in ratings {
            let card = match fetch_card(&tx, owner, card_id)? {
                Some(card) => card,
                None => return fail(format!("no card with id {card_id}.")),
            };
            let memory = compute_next_state(&card.memory, rating, now)?;
            update_card_memory(&tx, card_id, &memory, now)?;
            insert_review(&tx, card_id, now, rating, &memory)?;
            log::debug!(
                "card {card_id} rated {rating}: E={:.2} streak={} due={}",
                memory.easiness,
                memory.consecutive_correct,
                memory.next_due_date
            );
            updated.push(Card {
                last_shown_at: now,
                memory,
                ..card
            });
        }
        tx.commit()?;
        Ok(updated)
    }

    pub fn deck_count(&self, owner: &Owner) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(
            "select count(*) from decks where owner = ?;",
            [owner],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn card_count(&self, owner: &Owner) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(
            "select count(*) from cards where owner = ?;",
            [owner],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// The number of ratings recorded for the owner's cards at or after
    /// `since`.
    pub fn review_count_since(&self, owner: &Owner, since: Timestamp) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(
            "select count(*) from reviews r join cards c on c.card_id = r.card_id where c.owner = ? and r.reviewed_at >= ?;",
            (owner, since),
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["decks"], |row| row.get(0))?;
    Ok(count > 0)
}

fn deck_from_row(row: &Row) -> rusqlite::Result<Deck> {
    Ok(Deck {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
    })
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        owner: row.get(1)?,
        deck_id: row.get(2)?,
        question: row.get(3)?,
        answer: row.get(4)?,
        created_at: row.get(5)?,
        last_shown_at: row.get(6)?,
        memory: CardMemoryState {
            easiness: row.get(7)?,
            consecutive_correct: row.get(8)?,
            next_due_date: row.get(9)?,
        },
    })
}

fn fetch_deck(conn: &Connection, owner: &Owner, deck_id: DeckId) -> Fallible<Option<Deck>> {
    let deck = conn
        .query_row(
            "select deck_id, owner, name, description from decks where deck_id = ? and owner = ?;",
            (deck_id, owner),
            deck_from_row,
        )
        .optional()?;
    Ok(deck)
}

fn find_deck_by_name(conn: &Connection, owner: &Owner, name: &str) -> Fallible<Option<Deck>> {
    let deck = conn
        .query_row(
            "select deck_id, owner, name, description from decks where owner = ? and name = ?;",
            (owner, name),
            deck_from_row,
        )
        .optional()?;
    Ok(deck)
}

fn get_or_create_deck(conn: &Connection, owner: &Owner, name: &str) -> Fallible<Deck> {
    match find_deck_by_name(conn, owner, name)? {
        Some(deck) => Ok(deck),
        None => insert_deck(conn, owner, name, ""),
    }
}

fn insert_deck(conn: &Connection, owner: &Owner, name: &str, description: &str) -> Fallible<Deck> {
    let sql = "insert into decks (owner, name, description) values (?, ?, ?) returning deck_id;";
    let id: DeckId = conn.query_row(sql, (owner, name, description), |row| row.get(0))?;
    log::debug!("Created deck {id} '{name}' for {owner}.");
    Ok(Deck {
        id,
        owner: owner.clone(),
        name: name.to_string(),
        description: description.to_string(),
    })
}

fn fetch_card(conn: &Connection, owner: &Owner, card_id: CardId) -> Fallible<Option<Card>> {
    let sql = format!("select {CARD_COLUMNS} from cards where card_id = ? and owner = ?;");
    let card = conn
        .query_row(&sql, (card_id, owner), card_from_row)
        .optional()?;
    Ok(card)
}

fn insert_card(
    conn: &Connection,
    owner: &Owner,
    deck_id: DeckId,
    question: &str,
    answer: &str,
    now: Timestamp,
) -> Fallible<Card> {
    let memory = CardMemoryState::fresh(now);
    let sql = "insert into cards (owner, deck_id, question, answer, created_at, last_shown_at, easiness, consecutive_correct, next_due_date) values (?, ?, ?, ?, ?, ?, ?, ?, ?) returning card_id;";
    let id: CardId = conn.query_row(
        sql,
        (
            owner,
            deck_id,
            question,
            answer,
            now,
            now,
            memory.easiness,
            memory.consecutive_correct,
            memory.next_due_date,
        ),
        |row| row.get(0),
    )?;
    log::debug!("Added card {id} to deck {deck_id}.");
    Ok(Card {
        id,
        owner: owner.clone(),
        deck_id,
        question: question.to_string(),
        answer: answer.to_string(),
        created_at: now,
        last_shown_at: now,
        memory,
    })
}

fn update_card_memory(
    conn: &Connection,
    card_id: CardId,
    memory: &CardMemoryState,
    now: Timestamp,
) -> Fallible<()> {
    let sql = "update cards set easiness = ?, consecutive_correct = ?, next_due_date = ?, last_shown_at = ? where card_id = ?;";
    conn.execute(
        sql,
        (
            memory.easiness,
            memory.consecutive_correct,
            memory.next_due_date,
            now,
            card_id,
        ),
    )?;
    Ok(())
}

fn insert_review(
    conn: &Connection,
    card_id: CardId,
    reviewed_at: Timestamp,
    rating: i64,
    memory: &CardMemoryState,
) -> Fallible<()> {
    let sql = "insert into reviews (card_id, reviewed_at, rating, easiness, consecutive_correct, next_due_date) values (?, ?, ?, ?, ?, ?);";
    conn.execute(
        sql,
        (
            card_id,
            reviewed_at,
            rating,
            memory.easiness,
            memory.consecutive_correct,
            memory.next_due_date,
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;

    fn t0() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap())
    }

    fn alice() -> Owner {
        Owner::new("alice")
    }

    fn open() -> Fallible<Database> {
        Database::new(":memory:")
    }

    #[test]
    fn test_reopen_existing_database() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("flashdeck.db");
        let path = path.to_str().unwrap();
        {
            let mut db = Database::new(path)?;
            db.create_card(&alice(), "Spanish", "perro", "dog", t0())?;
        }
        let db = Database::new(path)?;
        assert_eq!(db.card_count(&alice())?, 1);
        Ok(())
    }

    #[test]
    fn test_duplicate_deck_name() -> Fallible<()> {
        let mut db = open()?;
        db.create_deck(&alice(), "Spanish", "vocab")?;
        let result = db.create_deck(&alice(), "Spanish", "again");
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: a deck named 'Spanish' already exists."
        );
        // Other owners may reuse the name.
        db.create_deck(&Owner::new("bob"), "Spanish", "")?;
        Ok(())
    }

    #[test]
    fn test_get_or_create_deck() -> Fallible<()> {
        let mut db = open()?;
        let a = db.get_or_create_deck(&alice(), "Chemistry")?;
        let b = db.get_or_create_deck(&alice(), "Chemistry")?;
        assert_eq!(a, b);
        assert_eq!(db.deck_count(&alice())?, 1);
        Ok(())
    }

    #[test]
    fn test_list_decks() -> Fallible<()> {
        let mut db = open()?;
        db.create_deck(&alice(), "Spanish", "")?;
        db.create_deck(&alice(), "German", "")?;
        db.create_deck(&Owner::new("bob"), "French", "")?;
        let all = db.list_decks(&alice(), None)?;
        let names: Vec<&str> = all.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Spanish", "German"]);
        let german = db.list_decks(&alice(), Some("German"))?;
        assert_eq!(german.len(), 1);
        assert_eq!(german[0].name, "German");
        assert!(db.list_decks(&alice(), Some("French"))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_get_deck_of_other_owner() -> Fallible<()> {
        let mut db = open()?;
        let deck = db.create_deck(&Owner::new("bob"), "French", "")?;
        assert!(db.get_deck(&alice(), deck.id).is_err());
        assert_eq!(db.get_deck(&Owner::new("bob"), deck.id)?, deck);
        Ok(())
    }

    #[test]
    fn test_delete_deck_removes_cards() -> Fallible<()> {
        let mut db = open()?;
        let (deck, card) = db.create_card(&alice(), "Spanish", "gato", "cat", t0())?;
        db.rate_card(&alice(), card.id, 4, t0())?;
        db.delete_deck(&alice(), deck.id)?;
        assert_eq!(db.card_count(&alice())?, 0);
        assert_eq!(db.review_count_since(&alice(), t0())?, 0);
        assert!(db.delete_deck(&alice(), deck.id).is_err());
        Ok(())
    }

    #[test]
    fn test_new_card_is_fresh() -> Fallible<()> {
        let mut db = open()?;
        let (deck, card) = db.create_card(&alice(), "Spanish", "casa", "house", t0())?;
        assert_eq!(card.memory, CardMemoryState::fresh(t0()));
        assert_eq!(db.get_card(&alice(), deck.id, card.id)?, card);
        Ok(())
    }

    #[test]
    fn test_add_card_to_missing_deck() -> Fallible<()> {
        let mut db = open()?;
        let result = db.add_card(&alice(), DeckId::new(99), "q", "a", t0());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_get_card_checks_deck_and_owner() -> Fallible<()> {
        let mut db = open()?;
        let (deck, card) = db.create_card(&alice(), "Spanish", "sol", "sun", t0())?;
        let other = db.create_deck(&alice(), "German", "")?;
        assert!(db.get_card(&alice(), other.id, card.id).is_err());
        assert!(db.get_card(&Owner::new("bob"), deck.id, card.id).is_err());
        Ok(())
    }

    #[test]
    fn test_rate_card() -> Fallible<()> {
        let mut db = open()?;
        let (deck, card) = db.create_card(&alice(), "Spanish", "luna", "moon", t0())?;
        let later = t0().saturating_add_days(2);
        let rated = db.rate_card(&alice(), card.id, 5, later)?;
        assert_eq!(rated.memory.consecutive_correct, 1);
        assert_eq!(rated.memory.next_due_date, later.saturating_add_days(6));
        assert_eq!(rated.last_shown_at, later);
        assert_eq!(db.get_card(&alice(), deck.id, card.id)?, rated);
        assert_eq!(db.review_count_since(&alice(), t0())?, 1);
        Ok(())
    }

    #[test]
    fn test_invalid_rating_rolls_back_batch() -> Fallible<()> {
        let mut db = open()?;
        let (deck, a) = db.create_card(&alice(), "Spanish", "uno", "one", t0())?;
        let (_, b) = db.create_card(&alice(), "Spanish", "dos", "two", t0())?;
        let result = db.rate_cards(&alice(), &[(a.id, 5), (b.id, 9)], t0());
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: invalid rating 9: ratings must be between 0 and 5."
        );
        assert_eq!(db.get_card(&alice(), deck.id, a.id)?, a);
        assert_eq!(db.review_count_since(&alice(), t0())?, 0);
        Ok(())
    }

    #[test]
    fn test_cannot_rate_other_owners_card() -> Fallible<()> {
        let mut db = open()?;
        let (_, card) = db.create_card(&Owner::new("bob"), "French", "chat", "cat", t0())?;
        assert!(db.rate_card(&alice(), card.id, 5, t0()).is_err());
        Ok(())
    }

    #[test]
    fn test_long_streak_keeps_deck_readable() -> Fallible<()> {
        let mut db = open()?;
        let (deck, card) = db.create_card(&alice(), "Spanish", "siempre", "always", t0())?;
        let mut rated = 0;
        let mut rejected = 0;
        for _ in 0..10 {
            match db.rate_card(&alice(), card.id, 5, t0()) {
                Ok(_) => rated += 1,
                Err(e) => {
                    assert_eq!(e.to_string(), "error: next due date is out of range.");
                    rejected += 1;
                }
            }
        }
        assert_eq!(rated, 6);
        assert_eq!(rejected, 4);
        let cards = db.list_cards(&alice(), deck.id)?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].memory.consecutive_correct, 6);
        assert!(cards[0].memory.next_due_date <= Timestamp::max_storable());
        assert_eq!(db.cards_to_study(&alice(), deck.id, i64::MAX, t0())?.len(), 1);
        assert_eq!(db.review_count_since(&alice(), t0())?, 6);
        Ok(())
    }

    #[test]
    fn test_cards_to_study() -> Fallible<()> {
        let mut db = open()?;
        let (deck, blank) = db.create_card(&alice(), "Spanish", "rojo", "red", t0())?;
        let (_, partial) = db.create_card(&alice(), "Spanish", "azul", "blue", t0())?;
        let (_, correct) = db.create_card(&alice(), "Spanish", "verde", "green", t0())?;
        db.rate_cards(
            &alice(),
            &[(blank.id, 0), (partial.id, 2), (correct.id, 3)],
            t0(),
        )?;
        let ids = |cards: Vec<Card>| cards.into_iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids(db.cards_to_study(&alice(), deck.id, 0, t0())?), vec![blank.id]);
        assert_eq!(
            ids(db.cards_to_study(&alice(), deck.id, 1, t0())?),
            vec![blank.id, partial.id]
        );
        assert_eq!(db.cards_to_study(&alice(), deck.id, 6, t0())?.len(), 3);
        assert_eq!(db.due_count(&alice(), deck.id, t0())?, 1);
        Ok(())
    }
}

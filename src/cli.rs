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

use std::io::stdin;
use std::io::stdout;

use clap::Parser;
use clap::Subcommand;
use serde::Serialize;

use crate::cmd::cards::add_card;
use crate::cmd::cards::due_batch;
use crate::cmd::cards::list_cards;
use crate::cmd::cards::rate_card;
use crate::cmd::cards::show_card;
use crate::cmd::decks::delete_deck;
use crate::cmd::decks::list_decks;
use crate::cmd::decks::new_deck;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::cmd::study::study;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::timestamp::Timestamp;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long, global = true)]
    directory: Option<String>,
    /// The owner to act as. Defaults to the configured owner.
    #[arg(long, global = true)]
    user: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List decks.
    Decks {
        /// Only show the deck with this name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Create a deck.
    NewDeck {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a deck and all of its cards.
    DeleteDeck { deck_id: i64 },
    /// Add a card, creating its deck if needed.
    Add {
        #[arg(long)]
        deck: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    /// List the cards in a deck.
    Cards {
        deck_id: i64,
        /// Only cards due within this many days.
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,
    },
    /// Show a single card.
    Card { deck_id: i64, card_id: i64 },
    /// Draw a random batch of due cards.
    Due {
        deck_id: i64,
        /// Look-ahead in days. Defaults to the configured horizon.
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,
    },
    /// Rate a card from 0 (blank) to 5 (perfect).
    Rate {
        card_id: i64,
        #[arg(allow_negative_numbers = true)]
        rating: i64,
    },
    /// Study a deck interactively.
    Study { deck_id: i64 },
    /// Print collection statistics.
    Stats {
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let mut collection = Collection::new(cli.directory, cli.user)?;
    let now = Timestamp::now();
    match cli.command {
        Command::Decks { name } => {
            print_json(&list_decks(&collection, name.as_deref(), now)?)
        }
        Command::NewDeck { name, description } => {
            print_json(&new_deck(&mut collection, &name, &description)?)
        }
        Command::DeleteDeck { deck_id } => delete_deck(&mut collection, DeckId::new(deck_id)),
        Command::Add {
            deck,
            question,
            answer,
        } => print_json(&add_card(&mut collection, &deck, &question, &answer, now)?),
        Command::Cards { deck_id, days } => {
            print_json(&list_cards(&collection, DeckId::new(deck_id), days, now)?)
        }
        Command::Card { deck_id, card_id } => print_json(&show_card(
            &collection,
            DeckId::new(deck_id),
            CardId::new(card_id),
        )?),
        Command::Due { deck_id, days } => {
            print_json(&due_batch(&collection, DeckId::new(deck_id), days, now)?)
        }
        Command::Rate { card_id, rating } => print_json(&rate_card(
            &mut collection,
            CardId::new(card_id),
            rating,
            now,
        )?),
        Command::Study { deck_id } => {
            study(
                &mut collection,
                DeckId::new(deck_id),
                &mut stdin().lock(),
                &mut stdout(),
                &mut rand::thread_rng(),
                now,
            )?;
            Ok(())
        }
        Command::Stats { format } => print_stats(&collection, format, now),
    }
}

fn print_json<T: Serialize>(value: &T) -> Fallible<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_rating() {
        let cli = Cli::try_parse_from(["flashdeck", "--user", "alice", "rate", "3", "-1"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Command::Rate { card_id, rating } => {
                assert_eq!(card_id, 3);
                assert_eq!(rating, -1);
            }
            _ => panic!("expected rate"),
        }
    }
}

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

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    deck_count: usize,
    card_count: usize,
    due_now_count: usize,
    today_review_count: usize,
}

pub fn collect_stats(collection: &Collection, now: Timestamp) -> Fallible<Stats> {
    let owner = &collection.owner;
    let mut due_now_count = 0;
    for deck in collection.db.list_decks(owner, None)? {
        due_now_count += collection.db.due_count(owner, deck.id, now)?;
    }
    Ok(Stats {
        deck_count: collection.db.deck_count(owner)?,
        card_count: collection.db.card_count(owner)?,
        due_now_count,
        today_review_count: collection
            .db
            .review_count_since(owner, now.start_of_day())?,
    })
}

pub fn print_stats(collection: &Collection, format: StatsFormat, now: Timestamp) -> Fallible<()> {
    let stats = collect_stats(collection, now)?;
    match format {
        StatsFormat::Text => {
            println!("Decks:          {}", stats.deck_count);
            println!("Cards:          {}", stats.card_count);
            println!("Due now:        {}", stats.due_now_count);
            println!("Reviewed today: {}", stats.today_review_count);
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

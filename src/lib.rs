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

//! flashdeck: flashcards scheduled with a SuperMemo-2 style algorithm.
//!
//! The scheduling core is [`scheduler::compute_next_state`] and
//! [`select::select_due`]. Both are pure, and take the current time as an
//! argument. Everything else stores cards in SQLite and drives the core from
//! the command line.

pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod db;
pub mod error;
pub mod scheduler;
pub mod select;
pub mod study;
pub mod types;

#[cfg(test)]
mod helper;

pub use error::{ErrorReport, Fallible, fail};
pub use scheduler::{ScheduleError, compute_next_state};
pub use select::select_due;
pub use types::memory_state::CardMemoryState;
pub use types::timestamp::Timestamp;

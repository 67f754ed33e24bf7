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

//! The SuperMemo-2 style review scheduler.
//!
//! Given a card's current [`CardMemoryState`] and a rating from 0 to 5, the
//! scheduler computes the card's next state. It is a pure function: the
//! current time is passed in, and nothing is read or written.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::memory_state::CardMemoryState;
use crate::types::memory_state::MIN_EASINESS;
use crate::types::rating::Rating;
use crate::types::rating::RatingClass;
use crate::types::timestamp::Timestamp;

/// The interval after the first correct rating of a streak, in days.
const FIRST_INTERVAL: f64 = 6.0;

/// The interval after a rating of 2, in days.
const PARTIAL_INTERVAL: f64 = 1.0;

#[derive(Debug, PartialEq)]
pub enum ScheduleError {
    /// The rating is outside `[0, 5]`.
    InvalidRating(i64),
    /// The next due date is beyond the range of representable timestamps.
    DueDateOutOfRange,
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidRating(rating) => write!(
                f,
                "invalid rating {rating}: ratings must be between {} and {}.",
                Rating::MIN,
                Rating::MAX
            ),
            ScheduleError::DueDateOutOfRange => {
                write!(f, "next due date is out of range.")
            }
        }
    }
}

impl Error for ScheduleError {}

/// Compute a card's next memory state from its current state, a rating, and
/// the time of the review.
pub fn compute_next_state(
    state: &CardMemoryState,
    rating: i64,
    now: Timestamp,
) -> Result<CardMemoryState, ScheduleError> {
    let rating = Rating::try_from(rating)?;
    let easiness = new_easiness(state.easiness, rating);
    let consecutive_correct = match rating.class() {
        RatingClass::Correct => state.consecutive_correct.saturating_add(1),
        RatingClass::Partial | RatingClass::Blank => 0,
    };
    let interval = interval_days(rating.class(), easiness, consecutive_correct);
    let next_due_date = now
        .checked_add_days(interval)
        .ok_or(ScheduleError::DueDateOutOfRange)?;
    Ok(CardMemoryState {
        easiness,
        consecutive_correct,
        next_due_date,
    })
}

/// The updated easiness, clamped to [`MIN_EASINESS`].
pub fn new_easiness(easiness: f64, rating: Rating) -> f64 {
    let r = rating.value() as f64;
    let easiness = easiness - 0.8 + 0.28 * r + 0.02 * r * r;
    if easiness < MIN_EASINESS {
        MIN_EASINESS
    } else {
        easiness
    }
}

/// The number of days until the card is due again. `easiness` and
/// `consecutive_correct` are the already-updated values.
pub fn interval_days(class: RatingClass, easiness: f64, consecutive_correct: u32) -> f64 {
    match class {
        RatingClass::Correct => {
            let exponent = consecutive_correct.saturating_sub(1) as f64;
            FIRST_INTERVAL * easiness.powf(exponent)
        }
        RatingClass::Blank => 0.0,
        RatingClass::Partial => PARTIAL_INTERVAL,
    }
}

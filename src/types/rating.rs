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

use crate::scheduler::ScheduleError;

/// A self-assessed recall quality, from 0 (total blank) to 5 (perfect).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Rating(u8);

/// How a rating affects the review streak.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RatingClass {
    /// Rating 3 to 5. The streak grows.
    Correct,
    /// Rating 2. The streak resets and the card comes back tomorrow.
    Partial,
    /// Rating 0 or 1. The streak resets and the card is due immediately.
    Blank,
}

impl Rating {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn class(self) -> RatingClass {
        if self.0 >= 3 {
            RatingClass::Correct
        } else if self.0 < 2 {
            RatingClass::Blank
        } else {
            RatingClass::Partial
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = ScheduleError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(ScheduleError::InvalidRating(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(value: i64) -> Result<Rating, ScheduleError> {
        Rating::try_from(value)
    }

    #[test]
    fn test_classification() -> Result<(), ScheduleError> {
        assert_eq!(rating(0)?.class(), RatingClass::Blank);
        assert_eq!(rating(1)?.class(), RatingClass::Blank);
        assert_eq!(rating(2)?.class(), RatingClass::Partial);
        assert_eq!(rating(3)?.class(), RatingClass::Correct);
        assert_eq!(rating(4)?.class(), RatingClass::Correct);
        assert_eq!(rating(5)?.class(), RatingClass::Correct);
        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(rating(-1), Err(ScheduleError::InvalidRating(-1)));
        assert_eq!(rating(6), Err(ScheduleError::InvalidRating(6)));
        assert_eq!(
            rating(i64::MAX),
            Err(ScheduleError::InvalidRating(i64::MAX))
        );
    }
}

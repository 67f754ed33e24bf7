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

use chrono::DateTime;
use chrono::NaiveTime;
use chrono::SecondsFormat;
use chrono::TimeDelta;
use chrono::Utc;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// 0001-01-01T00:00:00.000000Z, in microseconds since the epoch.
const MIN_STORABLE_MICROS: i64 = -62_135_596_800_000_000;

/// 9999-12-31T23:59:59.999999Z, in microseconds since the epoch.
const MAX_STORABLE_MICROS: i64 = 253_402_300_799_999_999;

/// An instant in UTC. Stored in the database as fixed-width RFC 3339 text,
/// so that string order matches chronological order. Arithmetic never
/// leaves the four-digit-year range that RFC 3339 can express.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// The earliest instant that can be stored.
    pub fn min_storable() -> Self {
        Self(DateTime::from_timestamp_micros(MIN_STORABLE_MICROS).unwrap_or_default())
    }

    /// The latest instant that can be stored.
    pub fn max_storable() -> Self {
        Self(DateTime::from_timestamp_micros(MAX_STORABLE_MICROS).unwrap_or_default())
    }

    fn is_storable(self) -> bool {
        (MIN_STORABLE_MICROS..=MAX_STORABLE_MICROS).contains(&self.0.timestamp_micros())
    }

    /// Add a possibly fractional number of days, at microsecond resolution.
    /// Returns `None` if the result falls outside the storable range.
    pub fn checked_add_days(self, days: f64) -> Option<Self> {
        let micros = (days * MICROS_PER_DAY).round();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return None;
        }
        let delta = TimeDelta::microseconds(micros as i64);
        self.0
            .checked_add_signed(delta)
            .map(Self)
            .filter(|ts| ts.is_storable())
    }

    /// Add a whole number of days, clamping to the storable range.
    pub fn saturating_add_days(self, days: i64) -> Self {
        let shifted = TimeDelta::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self);
        match shifted {
            Some(ts) if ts.is_storable() => ts,
            _ if days < 0 => Self::min_storable(),
            _ => Self::max_storable(),
        }
    }

    /// Midnight UTC on the same calendar day.
    pub fn start_of_day(self) -> Self {
        Self(self.0.date_naive().and_time(NaiveTime::MIN).and_utc())
    }

    fn to_storage(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_storage())
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_storage()))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        let ts =
            DateTime::parse_from_rfc3339(&string).map_err(|e| FromSqlError::Other(Box::new(e)))?;
        Ok(Timestamp(ts.with_timezone(&Utc)))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_storage())
    }
}

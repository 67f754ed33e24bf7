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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// The name of the optional configuration file in a collection directory.
pub const CONFIG_FILE_NAME: &str = "flashdeck.toml";

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the SQLite database, relative to the collection directory.
    pub database: PathBuf,
    /// The owner to act as when none is given on the command line.
    pub owner: String,
    /// The maximum number of cards in a study batch.
    pub card_limit: usize,
    /// The default look-ahead for listing due cards, in days.
    pub horizon_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("flashdeck.db"),
            owner: "default".to_string(),
            card_limit: 5,
            horizon_days: 0,
        }
    }
}

impl Config {
    /// Load the configuration from `directory`, falling back to the defaults
    /// if there is no configuration file.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE_NAME}, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if config.card_limit == 0 {
            return fail("card_limit must be at least 1.");
        }
        if config.owner.is_empty() {
            return fail("owner must not be empty.");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Fallible<()> {
        let config = Config::parse("owner = \"alice\"\ncard_limit = 20\n")?;
        assert_eq!(config.owner, "alice");
        assert_eq!(config.card_limit, 20);
        assert_eq!(config.database, PathBuf::from("flashdeck.db"));
        assert_eq!(config.horizon_days, 0);
        Ok(())
    }

    #[test]
    fn test_zero_card_limit() {
        let result = Config::parse("card_limit = 0");
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: card_limit must be at least 1."
        );
    }

    #[test]
    fn test_unknown_key() {
        assert!(Config::parse("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_missing_file() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }
}

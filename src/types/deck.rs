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

use serde::Serialize;

use crate::types::ids::DeckId;
use crate::types::ids::Owner;

/// A named group of cards belonging to one owner.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Deck {
    pub id: DeckId,
    pub owner: Owner,
    pub name: String,
    pub description: String,
}

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

use tempfile::TempDir;
use tempfile::tempdir;

use crate::collection::Collection;
use crate::error::Fallible;

/// Create a collection in a fresh temporary directory. The directory is
/// removed when the returned guard is dropped.
pub fn create_tmp_collection() -> Fallible<(TempDir, Collection)> {
    let dir = tempdir()?;
    let collection = Collection::new(Some(dir.path().display().to_string()), None)?;
    Ok((dir, collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ids::Owner;

    #[test]
    fn test_create_tmp_collection() -> Fallible<()> {
        let (dir, collection) = create_tmp_collection()?;
        assert!(dir.path().join("flashdeck.db").exists());
        assert_eq!(collection.owner, Owner::new("default"));
        Ok(())
    }
}

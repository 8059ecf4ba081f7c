//! Persisted form of a policy table

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::table::PolicyTable;
use crate::{Error, Result, identifiers::StateHash, tictactoe::Player};

/// One `(hash, value)` row of a persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub hash: StateHash,
    pub value: f64,
}

/// Training metadata stored alongside the values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Self-play episodes the table has been trained for
    pub episodes: usize,
    /// Learning rate used by the last training run
    pub learning_rate: Option<f64>,
    /// Seed of the last training run
    pub seed: Option<u64>,
}

/// Serializable representation of a trained policy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicy {
    /// Version of the save format
    pub version: u32,
    /// Player whose perspective the values describe
    pub player: Player,
    pub metadata: PolicyMetadata,
    /// Entries in ascending hash order
    pub entries: Vec<PolicyEntry>,
}

impl SavedPolicy {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &PolicyTable, metadata: PolicyMetadata) -> Self {
        Self {
            version: Self::VERSION,
            player: table.player(),
            metadata,
            entries: table
                .iter()
                .map(|(hash, value)| PolicyEntry { hash, value })
                .collect(),
        }
    }

    /// Rebuild the table, checking version, ordering and value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPolicyFile`] naming `source` when the content
    /// is inconsistent.
    pub fn to_table(&self, source: &Path) -> Result<PolicyTable> {
        let malformed = |message: String| Error::MalformedPolicyFile {
            path: source.to_path_buf(),
            message,
        };

        if self.version != Self::VERSION {
            return Err(malformed(format!(
                "unsupported format version {} (expected {})",
                self.version,
                Self::VERSION
            )));
        }

        if let Some(pair) = self
            .entries
            .windows(2)
            .find(|pair| pair[0].hash >= pair[1].hash)
        {
            return Err(malformed(format!(
                "entries are not in strictly ascending hash order at {}",
                pair[1].hash
            )));
        }

        PolicyTable::from_entries(
            self.player,
            self.entries.iter().map(|entry| (entry.hash, entry.value)),
        )
        .map_err(|err| malformed(err.to_string()))
    }
}

/// On-disk encoding of a policy file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormat {
    MsgPack,
    Json,
}

impl PolicyFormat {
    /// Pick the format from the file extension: `.json` is JSON, anything
    /// else MessagePack.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => PolicyFormat::Json,
            _ => PolicyFormat::MsgPack,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::tictactoe::BoardState;

    fn sample_table() -> PolicyTable {
        let empty = BoardState::new();
        let center = empty.next_state(1, 1, Player::X).unwrap();
        PolicyTable::from_entries(
            Player::X,
            [(empty.hash_key(), 0.5), (center.hash_key(), 0.62)],
        )
        .unwrap()
    }

    #[test]
    fn entries_are_saved_in_hash_order() {
        let saved = SavedPolicy::from_table(&sample_table(), PolicyMetadata::default());
        assert_eq!(saved.version, SavedPolicy::VERSION);
        assert_eq!(saved.entries.len(), 2);
        assert!(saved.entries[0].hash < saved.entries[1].hash);
    }

    #[test]
    fn to_table_restores_values() {
        let table = sample_table();
        let saved = SavedPolicy::from_table(&table, PolicyMetadata::default());
        let restored = saved.to_table(Path::new("policy.bin")).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn unknown_version_is_malformed() {
        let mut saved = SavedPolicy::from_table(&sample_table(), PolicyMetadata::default());
        saved.version = 99;
        assert!(matches!(
            saved.to_table(Path::new("policy.bin")),
            Err(Error::MalformedPolicyFile { .. })
        ));
    }

    #[test]
    fn unordered_entries_are_malformed() {
        let mut saved = SavedPolicy::from_table(&sample_table(), PolicyMetadata::default());
        saved.entries.reverse();
        let err = saved.to_table(Path::new("policy.bin")).unwrap_err();
        assert!(err.is_policy_load_failure());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            PolicyFormat::for_path(&PathBuf::from("policy_first.bin")),
            PolicyFormat::MsgPack
        );
        assert_eq!(
            PolicyFormat::for_path(&PathBuf::from("out/policy.JSON")),
            PolicyFormat::Json
        );
        assert_eq!(
            PolicyFormat::for_path(&PathBuf::from("policy")),
            PolicyFormat::MsgPack
        );
    }
}

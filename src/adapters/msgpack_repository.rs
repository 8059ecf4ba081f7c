//! MessagePack implementation of the policy repository.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, policy::SavedPolicy, ports::PolicyRepository};

/// MessagePack-based policy repository.
///
/// This is the default format for `policy_first.bin` / `policy_second.bin`.
///
/// # Examples
///
/// ```no_run
/// use td_tictactoe::adapters::MsgPackRepository;
/// use td_tictactoe::policy::{PolicyMetadata, PolicyTable, SavedPolicy};
/// use td_tictactoe::ports::PolicyRepository;
/// use td_tictactoe::tictactoe::Player;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let table = PolicyTable::untrained(Player::X);
/// let saved = SavedPolicy::from_table(&table, PolicyMetadata::default());
///
/// repo.save(&saved, Path::new("policy_first.bin"))?;
/// let loaded = repo.load(Path::new("policy_first.bin"))?;
/// # Ok::<(), td_tictactoe::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl PolicyRepository for MsgPackRepository {
    fn save(&self, policy: &SavedPolicy, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, policy).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize policy to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush {}", path.display()),
            source,
        })
    }

    fn load(&self, path: &Path) -> Result<SavedPolicy> {
        let file = File::open(path).map_err(|source| Error::PolicyNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::MalformedPolicyFile {
                path: path.to_path_buf(),
                message: format!("cannot decode MessagePack: {e}"),
            }
        })
    }
}

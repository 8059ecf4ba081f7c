//! Repository port for policy persistence.
//!
//! This module defines the trait boundary between the learning code and the
//! storage format of trained tables.

use std::path::Path;

use crate::{Result, policy::SavedPolicy};

/// Port for persisting and loading trained policies.
///
/// # Examples
///
/// ```no_run
/// use td_tictactoe::policy::SavedPolicy;
/// use td_tictactoe::ports::PolicyRepository;
/// use std::path::Path;
///
/// fn save_policy<R: PolicyRepository>(
///     repo: &R,
///     policy: &SavedPolicy,
///     path: &Path,
/// ) -> td_tictactoe::Result<()> {
///     repo.save(policy, path)
/// }
/// ```
pub trait PolicyRepository {
    /// Save a policy to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) when the file cannot be
    /// created, or a serialization error when encoding fails.
    fn save(&self, policy: &SavedPolicy, path: &Path) -> Result<()>;

    /// Load a policy from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PolicyNotFound`](crate::Error::PolicyNotFound) when the
    /// file cannot be opened and
    /// [`Error::MalformedPolicyFile`](crate::Error::MalformedPolicyFile) when
    /// its content cannot be decoded.
    fn load(&self, path: &Path) -> Result<SavedPolicy>;
}

//! Learned state values
//!
//! A [`PolicyTable`] maps each board hash to the owning player's estimated
//! probability of winning from that position. Tables are filled by the
//! self-play trainer and persisted as an ordered list of `(hash, value)`
//! pairs wrapped in a versioned [`SavedPolicy`].

pub mod serialization;
pub mod table;

pub use serialization::{PolicyEntry, PolicyFormat, PolicyMetadata, SavedPolicy};
pub use table::{DEFAULT_VALUE, PolicyTable};

//! Adapters implementing the ports.
//!
//! - [`MsgPackRepository`]: compact binary policy files (default)
//! - [`JsonRepository`]: human-readable policy files

pub mod json_repository;
pub mod msgpack_repository;

use std::path::Path;

pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;

use crate::{policy::PolicyFormat, ports::PolicyRepository};

/// Repository matching the extension of `path`.
pub fn repository_for(path: &Path) -> Box<dyn PolicyRepository> {
    match PolicyFormat::for_path(path) {
        PolicyFormat::MsgPack => Box::new(MsgPackRepository::new()),
        PolicyFormat::Json => Box::new(JsonRepository::new()),
    }
}

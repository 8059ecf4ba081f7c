//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the engine and implemented by adapters
//! (storage formats) and pipeline observers (reporting).

pub mod observer;
pub mod repository;

pub use observer::Observer;
pub use repository::PolicyRepository;

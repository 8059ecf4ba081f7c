//! Training and evaluation pipeline
//!
//! This module provides:
//! - Self-play training with TD backups
//! - Head-to-head competition between trained agents
//! - Exhaustive evaluation against every (or every optimal) reply
//! - Observers reporting on training runs

pub mod compete;
pub mod evaluation;
pub mod observers;
pub mod training;

pub use compete::{CompetitionReport, OutcomeTally, compete};
pub use evaluation::{Evaluation, Replies, exhaustive_outcomes};
pub use observers::{LoggingObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{Episode, Trainer, TrainingReport, play_episode, train};

pub use crate::ports::Observer;

//! CLI infrastructure for training and playing the agents
//!
//! This module provides the command-line interface for self-play training,
//! head-to-head competition, exhaustive evaluation and interactive play.

pub mod commands;
pub mod output;

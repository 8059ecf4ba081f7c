//! Subcommands of the `tictactoe` binary

pub mod compete;
pub mod evaluate;
pub mod play;
pub mod train;

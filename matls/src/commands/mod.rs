//! Subcommand implementations, one per mode.

pub mod header;
pub mod list;
pub mod show;
pub mod verify;

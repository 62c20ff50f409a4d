//! Subcommands.

pub mod create;

//! CLI subcommand implementations.

pub mod list;
pub mod metadata;
pub mod values;

//! Command-line interface for `vitrine`.

pub mod args;
pub mod commands;

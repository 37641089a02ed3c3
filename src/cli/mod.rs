//! Command-line interface
//!
//! Argument definitions and command handlers for the `procsite` binary.

pub mod args;
pub mod commands;

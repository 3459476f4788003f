//! Integration tests for the `logshift` binary.

mod basic_pipe;
mod config_custom;
mod ordering;

//! curate-cli
//!
//! Command-line front end for the evidence engine: inspect how a schema
//! lays out, validate and render an evidence file, and summarise scores.

pub mod commands;
pub mod config;

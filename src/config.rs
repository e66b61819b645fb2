//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that drives the player defaults,
//! controls, library scanning and logging, plus helpers to load it from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;

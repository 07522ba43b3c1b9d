//! Glue between the command line and the Hobart crates.
//!
//! Reads the run manifest, loads the asset price exports it names, and
//! renders results for the terminal or a file.

pub(crate) mod manifest;
pub(crate) mod render;

//! Protocol definitions for the brewhands ordering agent.
//!
//! This crate holds the traits and wire types shared between the tool
//! dispatcher (the binary) and the extension that implements the ordering
//! workflow. It carries no behavior of its own beyond validation helpers.

pub mod error;
pub mod extension;
pub mod tool;
pub mod types;

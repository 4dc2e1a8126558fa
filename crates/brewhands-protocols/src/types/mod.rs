//! Common types shared across protocols.

mod common;

pub use common::*;

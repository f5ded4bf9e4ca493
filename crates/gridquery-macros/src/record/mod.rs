//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates the field accessor map and field name constants that let a
//! struct be filtered, searched and sorted by field name.

mod attrs;
mod derive;

pub use derive::record_derive_impl;

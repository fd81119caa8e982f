//! Validated input for the authoring operations.

pub mod articles;
pub mod categories;
pub mod tags;

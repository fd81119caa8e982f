//! Diesel row types and their conversions to and from domain entities.

pub mod article;
pub mod category;
#[cfg(feature = "app")]
pub mod config;
pub mod tag;
pub mod visitor;

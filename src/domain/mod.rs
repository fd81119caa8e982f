//! Domain entities and value types shared by the repository and service
//! layers.

pub mod article;
pub mod category;
pub mod tag;
pub mod types;
pub mod visibility;
pub mod visitor;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TagId, TagName, TagUsage};

/// Reusable label attached to taggable entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    /// Popularity counter: number of live associations.
    pub number: TagUsage,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTag {
    pub name: TagName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

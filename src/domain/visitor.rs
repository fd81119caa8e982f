use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ArticleId, VisitorKey};

/// One entry of the visitor log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVisit {
    pub article_id: ArticleId,
    pub visitor: VisitorKey,
    pub visited_at: NaiveDateTime,
}

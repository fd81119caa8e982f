use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::visitor::NewVisit as DomainNewVisit;

/// Insertable row of the `visitors` log.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::visitors)]
pub struct NewVisit<'a> {
    pub article_id: i32,
    pub visitor: &'a str,
    pub created_at: NaiveDateTime,
}

impl<'a> From<&'a DomainNewVisit> for NewVisit<'a> {
    fn from(visit: &'a DomainNewVisit) -> Self {
        Self {
            article_id: visit.article_id.get(),
            visitor: visit.visitor.as_str(),
            created_at: visit.visited_at,
        }
    }
}

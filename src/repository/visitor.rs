use diesel::prelude::*;

use crate::domain::types::ArticleId;
use crate::domain::visitor::NewVisit;
use crate::models::visitor::NewVisit as DbNewVisit;
use crate::repository::{DieselRepository, RepositoryResult, VisitorReader, VisitorWriter};

impl VisitorWriter for DieselRepository {
    fn log_visit(&self, visit: &NewVisit) -> RepositoryResult<usize> {
        use crate::schema::visitors;

        let mut conn = self.conn()?;
        let db_visit: DbNewVisit = visit.into();

        let affected = diesel::insert_into(visitors::table)
            .values(&db_visit)
            .execute(&mut conn)?;

        Ok(affected)
    }
}

impl VisitorReader for DieselRepository {
    fn count_visits(&self, article_id: ArticleId) -> RepositoryResult<usize> {
        use crate::schema::visitors;

        let mut conn = self.conn()?;

        let total = visitors::table
            .filter(visitors::article_id.eq(article_id.get()))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }
}

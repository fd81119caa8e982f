use chrono::Utc;
use diesel::prelude::*;

use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{
    Category as DbCategory, CategoryChanges as DbCategoryChanges, NewCategory as DbNewCategory,
};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .filter(categories::deleted_at.is_null())
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .filter(categories::deleted_at.is_null())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn count_child_categories(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let children = categories::table
            .filter(categories::parent_id.eq(id.get()))
            .filter(categories::deleted_at.is_null())
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(children as usize)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.into();

        let created = diesel::insert_into(categories::table)
            .values(&db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_changes: DbCategoryChanges = changes.into();

        let affected = diesel::update(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::deleted_at.is_null()),
        )
        .set(&db_changes)
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn soft_delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        // The child check and the delete share the write lock, so no child
        // can be attached in between.
        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let children = categories::table
                .filter(categories::parent_id.eq(id.get()))
                .filter(categories::deleted_at.is_null())
                .count()
                .get_result::<i64>(conn)?;
            if children > 0 {
                return Err(RepositoryError::Conflict(format!(
                    "category {id} still has {children} subcategories"
                )));
            }

            let affected = diesel::update(
                categories::table
                    .filter(categories::id.eq(id.get()))
                    .filter(categories::deleted_at.is_null()),
            )
            .set(categories::deleted_at.eq(Some(Utc::now().naive_utc())))
            .execute(conn)?;

            Ok(affected)
        })
    }
}

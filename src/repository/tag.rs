use std::collections::BTreeSet;

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::tag::{NewTag, Tag};
use crate::domain::types::{TagId, Taggable};
use crate::models::tag::{NewTag as DbNewTag, NewTaggable, Tag as DbTag};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, TagReader, TagWriter,
};

fn into_domain(rows: Vec<DbTag>) -> RepositoryResult<Vec<Tag>> {
    Ok(rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<Tag>, _>>()?)
}

impl TagReader for DieselRepository {
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        let rows = tags::table
            .filter(tags::deleted_at.is_null())
            .order(tags::id.asc())
            .load::<DbTag>(&mut conn)?;

        into_domain(rows)
    }

    fn get_tag_by_id(&self, id: TagId) -> RepositoryResult<Option<Tag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        let tag = tags::table
            .filter(tags::id.eq(id.get()))
            .filter(tags::deleted_at.is_null())
            .first::<DbTag>(&mut conn)
            .optional()?;

        let tag = tag.map(TryInto::try_into).transpose()?;
        Ok(tag)
    }

    fn list_hot_tags(&self, limit: usize) -> RepositoryResult<Vec<Tag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        let rows = tags::table
            .filter(tags::deleted_at.is_null())
            .order((tags::number.desc(), tags::id.asc()))
            .limit(limit as i64)
            .load::<DbTag>(&mut conn)?;

        into_domain(rows)
    }

    fn list_tags_for(&self, taggable: Taggable) -> RepositoryResult<Vec<Tag>> {
        use crate::schema::{taggables, tags};

        let mut conn = self.conn()?;

        let rows = tags::table
            .inner_join(taggables::table)
            .filter(taggables::taggable_type.eq(taggable.kind().as_str()))
            .filter(taggables::taggable_id.eq(taggable.id()))
            .filter(tags::deleted_at.is_null())
            .select(tags::all_columns)
            .order(tags::id.asc())
            .load::<DbTag>(&mut conn)?;

        into_domain(rows)
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, tag: &NewTag) -> RepositoryResult<Tag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_tag: DbNewTag = tag.into();

        let created = diesel::insert_into(tags::table)
            .values(&db_tag)
            .get_result::<DbTag>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn soft_delete_tag(&self, id: TagId) -> RepositoryResult<usize> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        let affected = diesel::update(
            tags::table
                .filter(tags::id.eq(id.get()))
                .filter(tags::deleted_at.is_null()),
        )
        .set(tags::deleted_at.eq(Some(Utc::now().naive_utc())))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn sync_tags(&self, taggable: Taggable, tag_ids: &[TagId]) -> RepositoryResult<usize> {
        use crate::schema::{taggables, tags};

        let wanted: Vec<i32> = tag_ids
            .iter()
            .map(|id| id.get())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let kind = taggable.kind().as_str();
        let target_id = taggable.id();

        let mut conn = self.conn()?;

        // Take the write lock up front: the whole replacement is applied or
        // none of it is.
        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let known = tags::table
                .filter(tags::id.eq_any(&wanted))
                .filter(tags::deleted_at.is_null())
                .count()
                .get_result::<i64>(conn)? as usize;
            if known != wanted.len() {
                return Err(RepositoryError::ValidationError(
                    "cannot attach unknown or deleted tags".to_string(),
                ));
            }

            let current: Vec<i32> = taggables::table
                .filter(taggables::taggable_type.eq(kind))
                .filter(taggables::taggable_id.eq(target_id))
                .select(taggables::tag_id)
                .load(conn)?;

            diesel::delete(
                taggables::table
                    .filter(taggables::taggable_type.eq(kind))
                    .filter(taggables::taggable_id.eq(target_id))
                    .filter(taggables::tag_id.ne_all(&wanted)),
            )
            .execute(conn)?;

            let additions: Vec<NewTaggable> = wanted
                .iter()
                .copied()
                .filter(|tag_id| !current.contains(tag_id))
                .map(|tag_id| NewTaggable {
                    tag_id,
                    taggable_id: target_id,
                    taggable_type: kind,
                })
                .collect();
            if !additions.is_empty() {
                diesel::insert_into(taggables::table)
                    .values(&additions)
                    .execute(conn)?;
            }

            let touched: BTreeSet<i32> = current.iter().chain(wanted.iter()).copied().collect();
            for tag_id in touched {
                let usage = taggables::table
                    .filter(taggables::tag_id.eq(tag_id))
                    .count()
                    .get_result::<i64>(conn)?;
                diesel::update(tags::table.filter(tags::id.eq(tag_id)))
                    .set(tags::number.eq(usage as i32))
                    .execute(conn)?;
            }

            Ok(wanted.len())
        })
    }
}

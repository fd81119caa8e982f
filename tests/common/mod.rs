//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_press::db::{DbPool, establish_connection_pool};
use pushkind_press::domain::article::{Article, NewArticle};
use pushkind_press::domain::category::{Category, NewCategory};
use pushkind_press::domain::tag::{NewTag, Tag};
use pushkind_press::domain::types::{
    ArticleSlug, ArticleTitle, CategoryId, CategoryName, TagName, VisitorKey,
};
use pushkind_press::domain::visibility::{AdminPolicy, CallerContext, RequestScope};
use pushkind_press::repository::{ArticleWriter, CategoryWriter, DieselRepository, TagWriter};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn ts(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

/// Request clock used by every scope in the integration tests.
pub fn now() -> NaiveDateTime {
    ts(2025, 6, 15)
}

pub fn anonymous() -> RequestScope {
    RequestScope::at(
        CallerContext::anonymous(VisitorKey::new("203.0.113.7").unwrap()),
        &AdminPolicy,
        now(),
    )
}

pub fn admin() -> RequestScope {
    RequestScope::at(
        CallerContext::admin(VisitorKey::new("admin").unwrap()),
        &AdminPolicy,
        now(),
    )
}

pub fn create_category(repo: &DieselRepository, name: &str, parent: Option<&Category>) -> Category {
    repo.create_category(&NewCategory {
        name: CategoryName::new(name).unwrap(),
        seo_desc: String::new(),
        parent_id: parent.map(|p| p.id),
        created_at: now(),
        updated_at: now(),
    })
    .expect("should create category")
}

pub fn create_article(
    repo: &DieselRepository,
    slug: &str,
    category_id: Option<CategoryId>,
    published_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
) -> Article {
    repo.create_article(&NewArticle {
        title: ArticleTitle::new(format!("Title {slug}")).unwrap(),
        slug: ArticleSlug::new(slug).unwrap(),
        content: format!("Content of {slug}"),
        category_id,
        published_at,
        created_at,
        updated_at: created_at,
    })
    .expect("should create article")
}

pub fn create_tag(repo: &DieselRepository, name: &str) -> Tag {
    repo.create_tag(&NewTag {
        name: TagName::new(name).unwrap(),
        created_at: now(),
        updated_at: now(),
    })
    .expect("should create tag")
}

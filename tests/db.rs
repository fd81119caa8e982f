use diesel::connection::SimpleConnection;

mod common;

#[test]
fn test_creates_and_migrates_db_file() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let mut conn = pool.get().expect("pooled connection");
    conn.batch_execute("SELECT id, slug, view_count FROM articles LIMIT 1")
        .expect("articles table exists");
}

#[test]
fn negative_view_counts_are_rejected_by_the_schema() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("pooled connection");
    let result = conn.batch_execute(
        "INSERT INTO articles (title, slug, content, view_count, created_at, updated_at) \
         VALUES ('t', 's', '', -1, '2025-01-01 00:00:00', '2025-01-01 00:00:00')",
    );
    assert!(result.is_err());
}

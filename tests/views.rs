use std::thread;

use pushkind_press::domain::types::VisitorKey;
use pushkind_press::domain::visibility::{AdminPolicy, CallerContext, RequestScope};
use pushkind_press::repository::{ArticleReader, VisitorReader};
use pushkind_press::services::articles::get_article_by_slug;

mod common;

use common::{admin, create_article, create_category, now, ts};

#[test]
fn concurrent_slug_fetches_lose_no_views() {
    const THREADS: usize = 8;
    const FETCHES_PER_THREAD: usize = 5;

    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let category = create_category(&repo, "News", None);
    let article = create_article(
        &repo,
        "popular",
        Some(category.id),
        Some(ts(2025, 1, 1)),
        ts(2025, 1, 1),
    );

    thread::scope(|s| {
        for t in 0..THREADS {
            let repo = repo.clone();
            s.spawn(move || {
                let visitor = VisitorKey::new(format!("10.0.0.{t}")).unwrap();
                let scope =
                    RequestScope::at(CallerContext::anonymous(visitor), &AdminPolicy, now());
                for _ in 0..FETCHES_PER_THREAD {
                    get_article_by_slug(&scope, "popular", &repo).expect("fetch succeeds");
                }
            });
        }
    });

    let expected = THREADS * FETCHES_PER_THREAD;
    let stored = repo
        .get_article_by_id(article.id, admin().visibility())
        .unwrap()
        .unwrap();
    assert_eq!(stored.view_count.get() as usize, expected);
    assert_eq!(repo.count_visits(article.id).unwrap(), expected);
}

#[test]
fn each_fetch_returns_the_incremented_count() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    create_article(&repo, "draft", None, None, ts(2025, 1, 1));

    let first = get_article_by_slug(&admin(), "draft", &repo).unwrap();
    let second = get_article_by_slug(&admin(), "draft", &repo).unwrap();
    assert_eq!(first.view_count, 1);
    assert_eq!(second.view_count, 2);
}

//! View-count tracking for slug-based article fetches.

use crate::domain::types::{ArticleId, ViewCount};
use crate::domain::visibility::RequestScope;
use crate::domain::visitor::NewVisit;
use crate::repository::{ArticleWriter, VisitorWriter};

/// Counts one view of `article_id` and appends it to the visitor log.
///
/// Both writes are best effort: a failure is logged and never reaches the
/// caller, and a failed increment does not prevent the visit from being
/// logged. Returns the new counter value when the increment succeeded.
pub fn record_view<R>(scope: &RequestScope, article_id: ArticleId, repo: &R) -> Option<ViewCount>
where
    R: ArticleWriter + VisitorWriter,
{
    let count = match repo.increment_view_count(article_id) {
        Ok(count) => Some(count),
        Err(e) => {
            log::warn!("Failed to increment view count of article {article_id}: {e}");
            None
        }
    };

    let visit = NewVisit {
        article_id,
        visitor: scope.caller().visitor.clone(),
        visited_at: scope.now(),
    };
    if let Err(e) = repo.log_visit(&visit) {
        log::warn!("Failed to log visit of article {article_id}: {e}");
    }

    count
}

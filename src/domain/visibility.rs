//! Draft visibility rules.
//!
//! Whether drafts are visible is decided once per request by building a
//! [`RequestScope`]. Every repository call made while serving the request
//! receives the same [`Visibility`], so draft filtering is either bypassed for
//! all queries of the request or applied to all of them.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::article::is_published;
use crate::domain::types::VisitorKey;

/// Identity of whoever issued the current request, as resolved by the
/// authentication layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerContext {
    pub visitor: VisitorKey,
    pub authenticated: bool,
    pub is_admin: bool,
}

impl CallerContext {
    /// Unauthenticated visitor identified by `visitor` (e.g. a remote address).
    pub fn anonymous(visitor: VisitorKey) -> Self {
        Self {
            visitor,
            authenticated: false,
            is_admin: false,
        }
    }

    pub fn user(visitor: VisitorKey) -> Self {
        Self {
            visitor,
            authenticated: true,
            is_admin: false,
        }
    }

    pub fn admin(visitor: VisitorKey) -> Self {
        Self {
            visitor,
            authenticated: true,
            is_admin: true,
        }
    }
}

/// Decides whether a caller may see draft articles.
pub trait VisibilityPolicy {
    fn is_privileged_viewer(&self, caller: &CallerContext) -> bool;
}

/// Authenticated administrators see drafts, everybody else does not.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminPolicy;

impl VisibilityPolicy for AdminPolicy {
    fn is_privileged_viewer(&self, caller: &CallerContext) -> bool {
        caller.authenticated && caller.is_admin
    }
}

/// Draft filter applied to article queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Drafts and published articles alike.
    IncludeDrafts,
    /// Only articles whose publish time is set and not after `as_of`.
    PublishedOnly { as_of: NaiveDateTime },
}

impl Visibility {
    pub fn allows(self, published_at: Option<NaiveDateTime>) -> bool {
        match self {
            Self::IncludeDrafts => true,
            Self::PublishedOnly { as_of } => is_published(published_at, as_of),
        }
    }
}

/// Per-request state: the caller, the request clock and the visibility that
/// was resolved for them.
#[derive(Debug, Clone)]
pub struct RequestScope {
    caller: CallerContext,
    now: NaiveDateTime,
    visibility: Visibility,
}

impl RequestScope {
    /// Resolves the visibility for `caller` using the current time.
    pub fn new<P>(caller: CallerContext, policy: &P) -> Self
    where
        P: VisibilityPolicy + ?Sized,
    {
        Self::at(caller, policy, Utc::now().naive_utc())
    }

    /// Same as [`Self::new`] with an explicit request clock.
    pub fn at<P>(caller: CallerContext, policy: &P, now: NaiveDateTime) -> Self
    where
        P: VisibilityPolicy + ?Sized,
    {
        let visibility = if policy.is_privileged_viewer(&caller) {
            Visibility::IncludeDrafts
        } else {
            Visibility::PublishedOnly { as_of: now }
        };
        Self {
            caller,
            now,
            visibility,
        }
    }

    pub fn caller(&self) -> &CallerContext {
        &self.caller
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_privileged(&self) -> bool {
        self.visibility == Visibility::IncludeDrafts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn visitor() -> VisitorKey {
        VisitorKey::new("127.0.0.1").unwrap()
    }

    #[test]
    fn only_authenticated_admins_are_privileged() {
        let policy = AdminPolicy;
        assert!(policy.is_privileged_viewer(&CallerContext::admin(visitor())));
        assert!(!policy.is_privileged_viewer(&CallerContext::user(visitor())));
        assert!(!policy.is_privileged_viewer(&CallerContext::anonymous(visitor())));

        let forged = CallerContext {
            visitor: visitor(),
            authenticated: false,
            is_admin: true,
        };
        assert!(!policy.is_privileged_viewer(&forged));
    }

    #[test]
    fn published_only_hides_missing_and_future_publish_times() {
        let visibility = Visibility::PublishedOnly { as_of: at(100) };
        assert!(!visibility.allows(None));
        assert!(!visibility.allows(Some(at(101))));
        assert!(visibility.allows(Some(at(100))));
        assert!(visibility.allows(Some(at(1))));
        assert!(Visibility::IncludeDrafts.allows(None));
    }

    #[test]
    fn scope_resolves_visibility_once_with_its_clock() {
        let scope = RequestScope::at(CallerContext::anonymous(visitor()), &AdminPolicy, at(50));
        assert_eq!(
            scope.visibility(),
            Visibility::PublishedOnly { as_of: at(50) }
        );
        assert!(!scope.is_privileged());

        let scope = RequestScope::at(CallerContext::admin(visitor()), &AdminPolicy, at(50));
        assert_eq!(scope.visibility(), Visibility::IncludeDrafts);
        assert_eq!(scope.now(), at(50));
    }
}

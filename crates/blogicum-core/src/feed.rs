use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::{CategoryId, Post, UserId};

/// Which posts a feed draws from before any filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post (index page).
    All,
    /// Posts filed under one category (category page).
    Category(CategoryId),
    /// Posts written by one user (profile page).
    Author(UserId),
}

/// Shape of the feed. Every option defaults to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedOptions {
    /// Keep only posts that are visible to everyone at the query instant.
    pub apply_visibility_filter: bool,
    /// Annotate each post with the number of its comments.
    pub include_comment_count: bool,
    /// Newest publication date first, ties in insertion order.
    /// When off, posts come back in insertion order.
    pub order_by_pub_date_desc: bool,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            apply_visibility_filter: true,
            include_comment_count: true,
            order_by_pub_date_desc: true,
        }
    }
}

/// A complete description of a feed request.
///
/// The store turns this into a single query. When the visibility filter is
/// applied, it must admit exactly the posts for which
/// [`is_generally_visible`](crate::visibility::is_generally_visible) holds at
/// `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub scope: FeedScope,
    pub options: FeedOptions,
    pub now: DateTime<Utc>,
}

impl FeedQuery {
    pub fn new(scope: FeedScope, now: DateTime<Utc>) -> Self {
        Self {
            scope,
            options: FeedOptions::default(),
            now,
        }
    }

    /// Feed of the whole site.
    pub fn all(now: DateTime<Utc>) -> Self {
        Self::new(FeedScope::All, now)
    }

    /// Feed of a profile page. The owner sees their own hidden posts too.
    pub fn profile(author: UserId, viewer_is_owner: bool, now: DateTime<Utc>) -> Self {
        Self::new(FeedScope::Author(author), now).with_visibility_filter(!viewer_is_owner)
    }

    pub fn with_visibility_filter(mut self, apply: bool) -> Self {
        self.options.apply_visibility_filter = apply;
        self
    }

    pub fn with_comment_count(mut self, include: bool) -> Self {
        self.options.include_comment_count = include;
        self
    }

    pub fn ordered_by_pub_date(mut self, ordered: bool) -> Self {
        self.options.order_by_pub_date_desc = ordered;
        self
    }
}

/// One post of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub post: Post,
    /// `Some` when the query asked for comment counts.
    pub comment_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_defaults_are_all_on() {
        let query = FeedQuery::all(fixtures::now());
        assert_eq!(query.scope, FeedScope::All);
        assert!(query.options.apply_visibility_filter);
        assert!(query.options.include_comment_count);
        assert!(query.options.order_by_pub_date_desc);
    }

    #[test]
    fn test_builder_toggles() {
        let query = FeedQuery::new(FeedScope::Category(CategoryId(3)), fixtures::now())
            .with_visibility_filter(false)
            .with_comment_count(false)
            .ordered_by_pub_date(false);

        assert_eq!(query.scope, FeedScope::Category(CategoryId(3)));
        assert_eq!(
            query.options,
            FeedOptions {
                apply_visibility_filter: false,
                include_comment_count: false,
                order_by_pub_date_desc: false,
            }
        );
    }

    #[test]
    fn test_profile_feed_unfiltered_for_owner_only() {
        let own = FeedQuery::profile(UserId(1), true, fixtures::now());
        assert_eq!(own.scope, FeedScope::Author(UserId(1)));
        assert!(!own.options.apply_visibility_filter);

        let other = FeedQuery::profile(UserId(1), false, fixtures::now());
        assert!(other.options.apply_visibility_filter);
    }
}

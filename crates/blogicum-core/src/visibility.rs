use chrono::{DateTime, Utc};

use crate::entity::{Post, UserId};

/// Whether a post is visible to everyone at `now`.
///
/// Requires the post to be published, its category (when it has one) to be
/// published, and its publication date to have been reached. A post without
/// a category passes the category check.
pub fn is_generally_visible(post: &Post, now: DateTime<Utc>) -> bool {
    post.is_published
        && post.category.as_ref().is_none_or(|c| c.is_published)
        && post.pub_date <= now
}

/// Whether `viewer` may open the post's detail page.
///
/// The author always sees their own post. Callers must answer `false` with
/// "not found" so hidden posts are indistinguishable from missing ones.
pub fn is_visible(post: &Post, viewer: Option<UserId>, now: DateTime<Utc>) -> bool {
    viewer == Some(post.author.id) || is_generally_visible(post, now)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::fixtures;

    fn hidden_variants() -> Vec<Post> {
        let author = fixtures::user(1, "author");

        let mut unpublished = fixtures::post(1, author.clone());
        unpublished.is_published = false;

        let mut future = fixtures::post(2, author.clone());
        future.pub_date = fixtures::now() + Duration::days(1);

        let mut hidden_category = fixtures::post(3, author);
        hidden_category.category = Some(fixtures::category(2, false));

        vec![unpublished, future, hidden_category]
    }

    #[test]
    fn test_published_post_visible_to_anonymous() {
        let post = fixtures::post(1, fixtures::user(1, "author"));
        assert!(is_visible(&post, None, fixtures::now()));
        assert!(is_visible(&post, Some(UserId(2)), fixtures::now()));
    }

    #[test]
    fn test_author_bypasses_every_rule() {
        for post in hidden_variants() {
            assert!(is_visible(&post, Some(UserId(1)), fixtures::now()));
        }

        let mut everything_off = fixtures::post(4, fixtures::user(1, "author"));
        everything_off.is_published = false;
        everything_off.pub_date = fixtures::now() + Duration::days(365);
        everything_off.category = Some(fixtures::category(2, false));
        assert!(is_visible(&everything_off, Some(UserId(1)), fixtures::now()));
    }

    #[test]
    fn test_hidden_posts_invisible_to_others() {
        for post in hidden_variants() {
            assert!(!is_visible(&post, None, fixtures::now()), "{}", post.id);
            assert!(
                !is_visible(&post, Some(UserId(2)), fixtures::now()),
                "{}",
                post.id
            );
        }
    }

    #[test]
    fn test_post_without_category_is_visible() {
        let mut post = fixtures::post(1, fixtures::user(1, "author"));
        post.category = None;
        assert!(is_generally_visible(&post, fixtures::now()));
        assert!(is_visible(&post, None, fixtures::now()));
    }

    #[test]
    fn test_pub_date_boundary_is_inclusive() {
        let mut post = fixtures::post(1, fixtures::user(1, "author"));
        post.pub_date = fixtures::now();
        assert!(is_generally_visible(&post, fixtures::now()));

        post.pub_date = fixtures::now() + Duration::milliseconds(1);
        assert!(!is_generally_visible(&post, fixtures::now()));
    }

    #[test]
    fn test_future_post_becomes_visible_once_due() {
        let mut post = fixtures::post(1, fixtures::user(1, "author"));
        post.pub_date = fixtures::now() + Duration::days(1);

        assert!(!is_visible(&post, None, fixtures::now()));
        assert!(is_visible(&post, None, fixtures::now() + Duration::days(2)));
    }

    #[test]
    fn test_unpublishing_category_hides_published_post() {
        let mut post = fixtures::post(1, fixtures::user(1, "author"));
        assert!(is_generally_visible(&post, fixtures::now()));

        if let Some(category) = post.category.as_mut() {
            category.is_published = false;
        }
        assert!(post.is_published);
        assert!(!is_generally_visible(&post, fixtures::now()));
    }
}

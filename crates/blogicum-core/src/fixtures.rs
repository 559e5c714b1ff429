//! Builders for domain objects used across unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::entity::{Category, CategoryId, Comment, CommentId, Post, PostId, User, UserId};

/// Fixed reference instant so tests never depend on the wall clock.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn user(id: i64, username: &str) -> User {
    User {
        id: UserId(id),
        username: username.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        date_joined: now() - Duration::days(365),
    }
}

pub fn category(id: i64, is_published: bool) -> Category {
    Category {
        id: CategoryId(id),
        title: format!("Category {}", id),
        description: "Description".to_string(),
        slug: format!("category-{}", id),
        is_published,
        created_at: now() - Duration::days(30),
    }
}

/// A published post from yesterday in a published category.
pub fn post(id: i64, author: User) -> Post {
    Post {
        id: PostId(id),
        title: format!("Post {}", id),
        text: "Text".to_string(),
        pub_date: now() - Duration::days(1),
        is_published: true,
        created_at: now() - Duration::days(2),
        image: None,
        author,
        category: Some(category(1, true)),
        location: None,
    }
}

pub fn comment(id: i64, post_id: i64, author: User) -> Comment {
    Comment {
        id: CommentId(id),
        text: "Comment".to_string(),
        created_at: now(),
        is_published: true,
        author,
        post_id: PostId(post_id),
    }
}

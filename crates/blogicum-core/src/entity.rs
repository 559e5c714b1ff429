use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters kept when an object is shown by its short name.
pub const OBJ_NAME_LENGTH: usize = 20;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Primary key of a registered user.
    UserId,
    "user"
);
id_type!(
    /// Primary key of a category.
    CategoryId,
    "category"
);
id_type!(
    /// Primary key of a location.
    LocationId,
    "location"
);
id_type!(
    /// Primary key of a post.
    PostId,
    "post"
);
id_type!(
    /// Primary key of a comment.
    CommentId,
    "comment"
);

fn short_name(s: &str) -> String {
    s.chars().take(OBJ_NAME_LENGTH).collect()
}

/// A registered user. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// "First Last" when either part is set, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
    /// Unique URL identifier.
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn short_title(&self) -> String {
        short_name(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn short_name(&self) -> String {
        short_name(&self.name)
    }
}

/// A post together with its eagerly loaded relations.
///
/// Whoever hands out a `Post` has already resolved the author, category and
/// location, so rendering never needs another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub text: String,
    /// Publication instant. A future value defers publication.
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    /// Path relative to the media directory.
    pub image: Option<String>,
    pub author: User,
    /// `None` when the post never had one or the category was deleted.
    pub category: Option<Category>,
    pub location: Option<Location>,
}

impl Post {
    pub fn short_title(&self) -> String {
        short_name(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub is_published: bool,
    pub author: User,
    pub post_id: PostId,
}

/// The author-editable fields of a post, as submitted through the post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub image: Option<String>,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
}

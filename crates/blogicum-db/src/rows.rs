//! Raw row shapes and their conversion into domain types.

use blogicum_core::{
    Category, CategoryId, Comment, CommentId, FeedEntry, Location, LocationId, Post, PostId, User,
    UserId,
};

use crate::{from_epoch_ms, DbError};

pub(crate) const USER_COLUMNS: &str =
    "u.id, u.username, u.first_name, u.last_name, u.email, u.date_joined";

/// Columns of a post joined with its author, category and location.
/// Must be followed by a `comment_count` column and [`POST_JOINS`].
pub(crate) const POST_COLUMNS: &str = r#"
    p.id, p.title, p.text, p.pub_date, p.is_published, p.created_at, p.image,
    u.id AS author_id, u.username AS author_username, u.first_name AS author_first_name,
    u.last_name AS author_last_name, u.email AS author_email,
    u.date_joined AS author_date_joined,
    c.id AS category_id, c.title AS category_title, c.description AS category_description,
    c.slug AS category_slug, c.is_published AS category_is_published,
    c.created_at AS category_created_at,
    l.id AS location_id, l.name AS location_name, l.is_published AS location_is_published,
    l.created_at AS location_created_at"#;

pub(crate) const POST_JOINS: &str = r#"
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id"#;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_joined: i64,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, DbError> {
        Ok(User {
            id: UserId(row.id),
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            date_joined: from_epoch_ms(row.date_joined)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: i64,
}

impl TryFrom<CategoryRow> for Category {
    type Error = DbError;

    fn try_from(row: CategoryRow) -> Result<Self, DbError> {
        Ok(Category {
            id: CategoryId(row.id),
            title: row.title,
            description: row.description,
            slug: row.slug,
            is_published: row.is_published,
            created_at: from_epoch_ms(row.created_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LocationRow {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: i64,
}

impl TryFrom<LocationRow> for Location {
    type Error = DbError;

    fn try_from(row: LocationRow) -> Result<Self, DbError> {
        Ok(Location {
            id: LocationId(row.id),
            name: row.name,
            is_published: row.is_published,
            created_at: from_epoch_ms(row.created_at)?,
        })
    }
}

/// A post row with every relation flattened in. Category and location
/// columns are all NULL when the relation is absent.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostRow {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: i64,
    pub is_published: bool,
    pub created_at: i64,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_email: String,
    pub author_date_joined: i64,
    pub category_id: Option<i64>,
    pub category_title: Option<String>,
    pub category_description: Option<String>,
    pub category_slug: Option<String>,
    pub category_is_published: Option<bool>,
    pub category_created_at: Option<i64>,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    pub location_is_published: Option<bool>,
    pub location_created_at: Option<i64>,
    pub comment_count: Option<i64>,
}

impl PostRow {
    pub fn into_entry(self) -> Result<FeedEntry, DbError> {
        let author = UserRow {
            id: self.author_id,
            username: self.author_username,
            first_name: self.author_first_name,
            last_name: self.author_last_name,
            email: self.author_email,
            date_joined: self.author_date_joined,
        }
        .try_into()?;

        let category = match (
            self.category_id,
            self.category_title,
            self.category_description,
            self.category_slug,
            self.category_is_published,
            self.category_created_at,
        ) {
            (Some(id), Some(title), Some(description), Some(slug), Some(is_published), Some(at)) => {
                Some(Category::try_from(CategoryRow {
                    id,
                    title,
                    description,
                    slug,
                    is_published,
                    created_at: at,
                })?)
            }
            _ => None,
        };

        let location = match (
            self.location_id,
            self.location_name,
            self.location_is_published,
            self.location_created_at,
        ) {
            (Some(id), Some(name), Some(is_published), Some(at)) => {
                Some(Location::try_from(LocationRow {
                    id,
                    name,
                    is_published,
                    created_at: at,
                })?)
            }
            _ => None,
        };

        let post = Post {
            id: PostId(self.id),
            title: self.title,
            text: self.text,
            pub_date: from_epoch_ms(self.pub_date)?,
            is_published: self.is_published,
            created_at: from_epoch_ms(self.created_at)?,
            image: self.image,
            author,
            category,
            location,
        };

        Ok(FeedEntry {
            post,
            comment_count: self.comment_count,
        })
    }
}

/// A comment row joined with its author.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub id: i64,
    pub text: String,
    pub created_at: i64,
    pub is_published: bool,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_email: String,
    pub author_date_joined: i64,
}

pub(crate) const COMMENT_SELECT: &str = r#"
    SELECT cm.id, cm.text, cm.created_at, cm.is_published, cm.post_id,
           u.id AS author_id, u.username AS author_username,
           u.first_name AS author_first_name, u.last_name AS author_last_name,
           u.email AS author_email, u.date_joined AS author_date_joined
    FROM comments cm
    JOIN users u ON u.id = cm.author_id"#;

impl TryFrom<CommentRow> for Comment {
    type Error = DbError;

    fn try_from(row: CommentRow) -> Result<Self, DbError> {
        let author = UserRow {
            id: row.author_id,
            username: row.author_username,
            first_name: row.author_first_name,
            last_name: row.author_last_name,
            email: row.author_email,
            date_joined: row.author_date_joined,
        }
        .try_into()?;

        Ok(Comment {
            id: CommentId(row.id),
            text: row.text,
            created_at: from_epoch_ms(row.created_at)?,
            is_published: row.is_published,
            author,
            post_id: PostId(row.post_id),
        })
    }
}

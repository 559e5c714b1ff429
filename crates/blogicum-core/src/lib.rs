//! Blogicum Core - Domain models, publication rules, and validation.
//!
//! This crate holds the decisions the blog makes about its content: which
//! posts a viewer may see, how listing feeds are shaped, and who may edit
//! what. It performs no I/O; the store and the web layer call into it.

pub mod authz;
pub mod entity;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod validation;
pub mod visibility;

// Re-exports for convenience
pub use authz::{authorize_mutation, can_mutate, Authored, MutationDecision};
pub use entity::{
    Category, CategoryId, Comment, CommentId, Location, LocationId, Post, PostDraft, PostId,
    User, UserId, OBJ_NAME_LENGTH,
};
pub use error::{PaginationError, ValidationError};
pub use feed::{FeedEntry, FeedOptions, FeedQuery, FeedScope};
pub use pagination::{paginate, Page, PageRequest, POSTS_PER_PAGE};
pub use validation::Validator;
pub use visibility::{is_generally_visible, is_visible};

#[cfg(test)]
pub(crate) mod fixtures;

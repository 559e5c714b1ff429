use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} is too long: {len} characters (max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} contains invalid characters: {value}")]
    InvalidCharacters { field: &'static str, value: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid date and time: {0}")]
    InvalidDateTime(String),

    #[error("Unknown {0}")]
    UnknownChoice(&'static str),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("The two password fields didn't match")]
    PasswordMismatch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page is not a number: {0}")]
    NotANumber(String),

    #[error("Page number {0} is less than 1")]
    BelowOne(i64),

    #[error("Page {page} contains no results (last page is {num_pages})")]
    Empty { page: usize, num_pages: usize },
}

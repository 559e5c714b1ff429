use crate::error::PaginationError;

/// Posts shown per page on every listing.
pub const POSTS_PER_PAGE: usize = 10;

/// A page number as requested in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Number(i64),
    Last,
}

impl PageRequest {
    /// Parse the `page` query parameter. Missing or empty means page 1.
    pub fn parse(raw: Option<&str>) -> Result<Self, PaginationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(PageRequest::Number(1)),
            Some("last") => Ok(PageRequest::Last),
            Some(s) => s
                .parse::<i64>()
                .map(PageRequest::Number)
                .map_err(|_| PaginationError::NotANumber(s.to_string())),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub number: usize,
    /// Always at least 1, even for an empty listing.
    pub num_pages: usize,
    /// Size of the whole listing.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }
}

/// Cut page `request` out of `items`.
///
/// An empty listing still has a first page. Any other page outside
/// `1..=num_pages` is an error, which listings report as "not found".
pub fn paginate<T>(
    items: Vec<T>,
    request: PageRequest,
    per_page: usize,
) -> Result<Page<T>, PaginationError> {
    let per_page = per_page.max(1);
    let total = items.len();
    let num_pages = total.div_ceil(per_page).max(1);

    let number = match request {
        PageRequest::Last => num_pages,
        PageRequest::Number(n) if n < 1 => return Err(PaginationError::BelowOne(n)),
        PageRequest::Number(n) => {
            let n = usize::try_from(n).unwrap_or(usize::MAX);
            if n > num_pages {
                return Err(PaginationError::Empty {
                    page: n,
                    num_pages,
                });
            }
            n
        }
    };

    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();

    Ok(Page {
        items,
        number,
        num_pages,
        total,
    })
}

//! Pagination types for list-shaped resources.

use serde::{Deserialize, Serialize};

/// Sort direction for a paginated request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDir {
    /// Returns the query-parameter spelling of this direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A request for a page of results.
///
/// The requested size is passed to the server as-is; if it exceeds the
/// server's maximum, the server decides what to return. No client-side
/// clamping takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    /// The page number (0-indexed).
    pub page: usize,
    /// The number of items per page.
    pub size: usize,
    /// The attribute to sort by, if any.
    pub sort: Option<String>,
    /// The sort direction.
    pub sort_dir: SortDir,
}

impl PaginationRequest {
    /// The default page size.
    pub const DEFAULT_SIZE: usize = 10;

    /// Creates a new page request.
    #[must_use]
    pub const fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            sort: None,
            sort_dir: SortDir::Asc,
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub const fn first() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }

    /// Sets the sort attribute and direction.
    #[must_use]
    pub fn sorted_by(mut self, sort: impl Into<String>, sort_dir: SortDir) -> Self {
        self.sort = Some(sort.into());
        self.sort_dir = sort_dir;
        self
    }

    /// Returns the element offset of this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page * self.size
    }

    /// Returns the element limit of this page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.size
    }
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Metadata describing a page's position within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// The current page number (0-indexed).
    pub page: usize,
    /// The number of items per page.
    pub size: usize,
    /// The total number of items across all pages.
    pub total_elements: u64,
    /// The total number of pages.
    pub total_pages: u64,
}

impl Pagination {
    /// Creates pagination metadata, deriving the page count from the
    /// total element count.
    #[must_use]
    pub const fn new(page: usize, size: usize, total_elements: u64) -> Self {
        let total_pages = if size > 0 {
            (total_elements + size as u64 - 1) / size as u64
        } else {
            0
        };

        Self {
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    /// Returns true if this is the first page.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.page == 0
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.page as u64 >= self.total_pages.saturating_sub(1)
    }
}

/// A single page of elements plus its pagination metadata.
///
/// Replaced wholesale on every successful fetch, never partially mutated.
/// Element order is the server-provided order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResource<T> {
    /// The elements on this page.
    pub elements: Vec<T>,
    /// Position of this page within the full result set.
    pub pagination: Pagination,
}

impl<T> PaginatedResource<T> {
    /// Creates a new paginated resource.
    #[must_use]
    pub fn new(elements: Vec<T>, pagination: Pagination) -> Self {
        Self {
            elements,
            pagination,
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(page: usize, size: usize) -> Self {
        Self::new(Vec::new(), Pagination::new(page, size, 0))
    }

    /// Creates the "not yet loaded" placeholder resource.
    ///
    /// This is the initial value a paginated service publishes before its
    /// first fetch completes; `is_loaded` returns false for it and only it.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(Vec::new(), Pagination::new(0, 0, 0))
    }

    /// Returns true once a real page has been published.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.pagination.size > 0 || self.pagination.total_elements > 0
    }

    /// Maps the elements to a different type, keeping the metadata.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResource<U> {
        PaginatedResource {
            elements: self.elements.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Returns true if the page holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the number of elements on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

impl<T> Default for PaginatedResource<T> {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl<T> IntoIterator for PaginatedResource<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

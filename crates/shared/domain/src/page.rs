//! Pagination and sorting types for list endpoints.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{DomainError, DomainResult};

/// Properties a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Status,
    Role,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Wire name of the property
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Username => "username",
            SortField::Email => "email",
            SortField::FirstName => "firstName",
            SortField::LastName => "lastName",
            SortField::Status => "status",
            SortField::Role => "role",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "username" => Ok(SortField::Username),
            "email" => Ok(SortField::Email),
            "firstName" => Ok(SortField::FirstName),
            "lastName" => Ok(SortField::LastName),
            "status" => Ok(SortField::Status),
            "role" => Ok(SortField::Role),
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            other => Err(DomainError::InvalidSortField(other.to_string())),
        }
    }
}

/// Sort direction; anything but a case-insensitive "DESC" is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse_lenient(value: &str) -> Self {
        if value.eq_ignore_ascii_case("DESC") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Zero-based page window with sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl PageRequest {
    /// Build a page request, rejecting sizes outside `1..=MAX_PAGE_SIZE` and
    /// windows whose offset does not fit a signed 64-bit SQL `OFFSET`.
    pub fn new(page: u64, size: u64, sort: Sort) -> DomainResult<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::InvalidPageSize {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        match page.checked_mul(size) {
            Some(offset) if offset <= i64::MAX as u64 => Ok(Self { page, size, sort }),
            _ => Err(DomainError::InvalidPageNumber(page)),
        }
    }

    /// Calculate offset for the store query
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Maximum number of items in the window
    pub fn limit(&self) -> u64 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

/// Page envelope returned by list and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", aliases(UserPage = Page<crate::user::UserResponse>))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Create a page, deriving the total page count as `ceil(total / size)`.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_pages(total_elements, request.size),
        }
    }

    /// Convert the content, keeping the window metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

fn total_pages(total: u64, size: u64) -> u64 {
    if size == 0 {
        0
    } else {
        total.div_ceil(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(0, 2, Sort::default()).unwrap();
        assert_eq!(Page::<u8>::new(vec![], &request, 3).total_pages, 2);
        assert_eq!(Page::<u8>::new(vec![], &request, 4).total_pages, 2);
        assert_eq!(Page::<u8>::new(vec![], &request, 0).total_pages, 0);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::new(3, 10, Sort::default()).unwrap();
        assert_eq!(request.offset(), 30);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(
            PageRequest::new(0, 0, Sort::default()),
            Err(DomainError::InvalidPageSize { size: 0, max: MAX_PAGE_SIZE })
        );
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1, Sort::default()).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE, Sort::default()).is_ok());
    }

    #[test]
    fn test_page_number_bounds() {
        assert_eq!(
            PageRequest::new(u64::MAX, 100, Sort::default()),
            Err(DomainError::InvalidPageNumber(u64::MAX))
        );
        assert_eq!(
            PageRequest::new(1 << 63, 2, Sort::default()),
            Err(DomainError::InvalidPageNumber(1 << 63))
        );

        let last = i64::MAX as u64 / 100;
        let request = PageRequest::new(last, 100, Sort::default()).unwrap();
        assert!(request.offset() <= i64::MAX as u64);
    }

    #[test]
    fn test_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 10);
        assert_eq!(request.sort.field, SortField::Id);
        assert_eq!(request.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("firstName".parse::<SortField>(), Ok(SortField::FirstName));
        assert_eq!(
            "password".parse::<SortField>(),
            Err(DomainError::InvalidSortField("password".to_string()))
        );
        assert_eq!(SortDirection::parse_lenient("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient("sideways"), SortDirection::Asc);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let request = PageRequest::new(1, 2, Sort::default()).unwrap();
        let page = Page::new(vec![1, 2], &request, 5).map(|n| n * 10);

        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
    }
}

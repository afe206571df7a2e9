//! Page request and page envelope shared by list and search use-cases.
//!
//! # Invariants
//! - A valid request has `page_number >= 0` and `page_size >= 1`.
//! - Requests are validated before any store access.
//! - `total_pages` is `ceil(total_elements / page_size)`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Ordering of a page over one entity field `F`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F> Sort<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

impl<F: FromStr<Err = String>> Sort<F> {
    /// Parses `field[,asc|desc]`, e.g. `title` or `createdDate,desc`.
    pub fn parse(text: &str) -> Result<Self, PageRequestError> {
        let mut parts = text.splitn(2, ',');
        let field_text = parts.next().unwrap_or_default();
        let field = field_text
            .parse::<F>()
            .map_err(PageRequestError::UnknownSortField)?;

        let direction = match parts.next().map(|value| value.trim().to_ascii_lowercase()) {
            None => Direction::Asc,
            Some(value) if value == "asc" => Direction::Asc,
            Some(value) if value == "desc" => Direction::Desc,
            Some(value) => return Err(PageRequestError::UnknownSortDirection(value)),
        };

        Ok(Self { field, direction })
    }
}

/// Errors from page request validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    InvalidPageNumber(i64),
    InvalidPageSize(i64),
    UnknownSortField(String),
    UnknownSortDirection(String),
}

impl Display for PageRequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPageNumber(value) => {
                write!(f, "page number must be at least 0, got {value}")
            }
            Self::InvalidPageSize(value) => write!(f, "page size must be at least 1, got {value}"),
            Self::UnknownSortField(value) => write!(f, "cannot sort by unknown field '{value}'"),
            Self::UnknownSortDirection(value) => {
                write!(f, "unknown sort direction '{value}'; expected asc|desc")
            }
        }
    }
}

impl Error for PageRequestError {}

/// Zero-based page selection with ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page_number: i64,
    pub page_size: i64,
    pub sort: Sort<F>,
}

impl<F: Default> PageRequest<F> {
    /// Page request using the entity's default sort (ascending title).
    pub fn of(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size,
            sort: Sort::default(),
        }
    }
}

impl<F> PageRequest<F> {
    pub fn with_sort(self, sort: Sort<F>) -> Self {
        Self {
            page_number: self.page_number,
            page_size: self.page_size,
            sort,
        }
    }

    pub fn validate(&self) -> Result<(), PageRequestError> {
        if self.page_size < 1 {
            return Err(PageRequestError::InvalidPageSize(self.page_size));
        }
        if self.page_number < 0 {
            return Err(PageRequestError::InvalidPageNumber(self.page_number));
        }
        Ok(())
    }

    /// Row offset of the first element on this page.
    pub fn offset(&self) -> i64 {
        self.page_number.saturating_mul(self.page_size)
    }
}

/// One bounded slice of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new<F>(content: Vec<T>, request: &PageRequest<F>, total_elements: u64) -> Self {
        let page_size = request.page_size.max(1) as u64;
        Self {
            content,
            page_number: request.page_number,
            page_size: request.page_size,
            total_elements,
            total_pages: total_elements.div_ceil(page_size),
        }
    }

    /// Converts every element, keeping paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Page, PageRequest, PageRequestError, Sort};
    use crate::model::case::CaseSortField;

    #[test]
    fn default_request_sorts_by_title_ascending() {
        let request = PageRequest::<CaseSortField>::of(0, 10);
        assert_eq!(request.sort.field, CaseSortField::Title);
        assert_eq!(request.sort.direction, Direction::Asc);
    }

    #[test]
    fn validation_rejects_empty_pages_and_negative_numbers() {
        let request = PageRequest::<CaseSortField>::of(0, 0);
        assert_eq!(request.validate(), Err(PageRequestError::InvalidPageSize(0)));

        let request = PageRequest::<CaseSortField>::of(-1, 5);
        assert_eq!(
            request.validate(),
            Err(PageRequestError::InvalidPageNumber(-1))
        );

        assert!(PageRequest::<CaseSortField>::of(0, 1).validate().is_ok());
    }

    #[test]
    fn offset_is_page_number_times_size() {
        assert_eq!(PageRequest::<CaseSortField>::of(3, 20).offset(), 60);
    }

    #[test]
    fn sort_spec_parses_field_and_direction() {
        let sort = Sort::<CaseSortField>::parse("createdDate,desc").unwrap();
        assert_eq!(sort, Sort::desc(CaseSortField::CreatedDate));

        let sort = Sort::<CaseSortField>::parse("caseNumber").unwrap();
        assert_eq!(sort, Sort::asc(CaseSortField::CaseNumber));

        assert_eq!(
            Sort::<CaseSortField>::parse("bogus"),
            Err(PageRequestError::UnknownSortField("bogus".to_string()))
        );
        assert_eq!(
            Sort::<CaseSortField>::parse("title,sideways"),
            Err(PageRequestError::UnknownSortDirection("sideways".to_string()))
        );
    }

    #[test]
    fn page_metadata_rounds_total_pages_up() {
        let request = PageRequest::<CaseSortField>::of(0, 20);
        let page = Page::new(vec![1, 2, 3], &request, 45);
        assert_eq!(page.total_pages, 3);

        let exact = Page::new(Vec::<i32>::new(), &PageRequest::<CaseSortField>::of(2, 15), 45);
        assert_eq!(exact.total_pages, 3);
    }

    #[test]
    fn map_keeps_metadata() {
        let request = PageRequest::<CaseSortField>::of(1, 2);
        let page = Page::new(vec![1, 2], &request, 5).map(|value| value * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
    }
}

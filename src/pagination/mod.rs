use std::cmp::Ordering;

use serde::Deserialize;
use thiserror::Error;

use crate::config::ApiConfig;

#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("Invalid sort field: {0}")]
    UnknownSortField(String),

    #[error("Sort field '{0}' is not supported here")]
    UnsupportedSortField(&'static str),
}

impl From<PaginationError> for crate::error::ApiError {
    fn from(err: PaginationError) -> Self {
        crate::error::ApiError::invalid_argument(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case sorts descending; everything else ascends.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Type,
    CreatedAt,
    LastModifiedAt,
}

impl SortField {
    pub fn parse(value: &str) -> Result<Self, PaginationError> {
        match value.trim() {
            "title" => Ok(SortField::Title),
            "type" => Ok(SortField::Type),
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "lastModifiedAt" | "last_modified_at" => Ok(SortField::LastModifiedAt),
            other => Err(PaginationError::UnknownSortField(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Type => "type",
            SortField::CreatedAt => "createdAt",
            SortField::LastModifiedAt => "lastModifiedAt",
        }
    }

    /// Column name. Only ever interpolated from this fixed set.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Type => "subsection_type",
            SortField::CreatedAt => "created_at",
            SortField::LastModifiedAt => "last_modified_at",
        }
    }
}

/// Raw `?pageNumber=&pageSize=&sortBy=&sortDir=` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_by: SortField,
    pub sort_dir: SortDirection,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32, sort_by: SortField, sort_dir: SortDirection) -> Self {
        Self {
            page_number,
            page_size: page_size.max(1),
            sort_by,
            sort_dir,
        }
    }

    /// Apply defaults and the configured page size ceiling.
    pub fn from_query(query: &PageQuery, api: &ApiConfig) -> Result<Self, PaginationError> {
        let sort_by = match query.sort_by.as_deref() {
            Some(s) if !s.trim().is_empty() => SortField::parse(s)?,
            _ => SortField::CreatedAt,
        };
        let sort_dir = query
            .sort_dir
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or(SortDirection::Desc);
        let page_size = query
            .page_size
            .unwrap_or(api.default_page_size)
            .clamp(1, api.max_page_size.max(1));

        Ok(Self::new(query.page_number.unwrap_or(0), page_size, sort_by, sort_dir))
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }

    /// Slice an already sorted list down to this page.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.page_size as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let api = AppConfig::development().api;
        let page = PageRequest::from_query(&PageQuery::default(), &api).unwrap();
        assert_eq!(page.page_number, 0);
        assert_eq!(page.page_size, api.default_page_size);
        assert_eq!(page.sort_by, SortField::CreatedAt);
        assert_eq!(page.sort_dir, SortDirection::Desc);
    }

    #[test]
    fn page_size_is_clamped() {
        let api = AppConfig::development().api;
        let query = PageQuery {
            page_size: Some(10_000),
            ..Default::default()
        };
        assert_eq!(PageRequest::from_query(&query, &api).unwrap().page_size, api.max_page_size);

        let query = PageQuery {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(PageRequest::from_query(&query, &api).unwrap().page_size, 1);
    }

    #[test]
    fn sort_direction_parsing() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Asc);
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let api = AppConfig::development().api;
        let query = PageQuery {
            sort_by: Some("password".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            PageRequest::from_query(&query, &api),
            Err(PaginationError::UnknownSortField(f)) if f == "password"
        ));
    }

    #[test]
    fn slice_skips_earlier_pages() {
        let page = PageRequest::new(1, 2, SortField::Title, SortDirection::Asc);
        assert_eq!(page.slice(vec![1, 2, 3, 4, 5]), vec![3, 4]);
    }
}

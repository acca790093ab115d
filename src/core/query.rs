//! List filters, sorting and pagination metadata

use crate::core::validation::{ValidationErrors, Validator, permitted_value};
use serde::Serialize;

/// Upper bound on `page`, keeps `offset()` far from overflow.
pub const MAX_PAGE: i64 = 10_000_000;

/// Upper bound on `page_size`.
pub const MAX_PAGE_SIZE: i64 = 100;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Sort tokens accepted by the list endpoint.
pub const DEFAULT_SORT_SAFELIST: &[&str] = &[
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Record columns a list can be ordered by.
///
/// The closed mapping from a safelisted sort token to a concrete column
/// identifier; nothing else reaches query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortColumn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(SortColumn::Id),
            "title" => Some(SortColumn::Title),
            "year" => Some(SortColumn::Year),
            "runtime" => Some(SortColumn::Runtime),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Title => "title",
            SortColumn::Year => "year",
            SortColumn::Runtime => "runtime",
        }
    }
}

/// Paging and sorting for a list query.
///
/// `sort` is a field name, optionally prefixed with `-` for descending
/// order. It must appear verbatim in `sort_safelist`: the derived column
/// name ends up in query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: "id".to_string(),
            sort_safelist: DEFAULT_SORT_SAFELIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Filters {
    /// Column named by `sort`, or `None` when `sort` is not safelisted.
    pub fn sort_column(&self) -> Option<&str> {
        if !permitted_value(self.sort.as_str(), &self.sort_safelist) {
            return None;
        }
        Some(self.sort.strip_prefix('-').unwrap_or(&self.sort))
    }

    /// Validate, then resolve the sort token to a known column.
    ///
    /// A token that is safelisted but names no known column fails the
    /// same way as one that is not safelisted.
    pub fn resolve_sort(&self) -> Result<(SortColumn, SortDirection), ValidationErrors> {
        self.validate()?;
        match self.sort_column().and_then(SortColumn::from_name) {
            Some(column) => Ok((column, self.sort_direction())),
            None => {
                let mut v = Validator::new();
                v.add_error("sort", "invalid sort value");
                Err(v.errors().clone())
            }
        }
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Run [`validate_filters`] on a fresh validator.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        validate_filters(&mut v, self);
        v.finish()
    }
}

/// Check page bounds and the sort token against the safelist.
pub fn validate_filters(v: &mut Validator, filters: &Filters) {
    v.check(filters.page > 0, "page", "must be greater than zero");
    v.check(
        filters.page <= MAX_PAGE,
        "page",
        "must be a maximum of 10 million",
    );
    v.check(filters.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );
    v.check(
        permitted_value(filters.sort.as_str(), &filters.sort_safelist),
        "sort",
        "invalid sort value",
    );
}

/// Pagination summary for a list response.
///
/// Every field is zero (and omitted on the wire) when nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl Metadata {
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records <= 0 || page_size <= 0 {
            return Self::default();
        }

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}

/// One page of matching records plus the pagination summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub metadata: Metadata,
}

impl<T> Page<T> {
    pub fn total_records(&self) -> i64 {
        self.metadata.total_records
    }
}

/// Search terms applied before paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdtoySearch {
    /// Word match against the title. Empty matches everything.
    pub title: String,
    /// Records must carry all of these genres. Empty matches everything.
    pub genres: Vec<String>,
}

impl EdtoySearch {
    pub fn new(title: impl Into<String>, genres: Vec<String>) -> Self {
        Self {
            title: title.into(),
            genres,
        }
    }
}

/// Lower-cased word tokens, the way a `simple` text-search parser splits text.
pub fn title_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when `title` contains every word of `query`.
///
/// An empty query matches everything. A query with no words at all
/// (punctuation only) matches nothing.
pub fn title_matches(title: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let wanted = title_tokens(query);
    if wanted.is_empty() {
        return false;
    }
    let have = title_tokens(title);
    wanted.iter().all(|w| have.contains(w))
}

/// True when `genres` is a superset of `wanted`.
pub fn genres_match(genres: &[String], wanted: &[String]) -> bool {
    wanted.iter().all(|w| genres.contains(w))
}

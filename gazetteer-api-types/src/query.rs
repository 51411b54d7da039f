//! Request-scoped query types: filter terms, sort specs and page bounds.
//!
//! These are constructed per request from query parameters and discarded
//! after the response is built. The storage layer translates them into
//! store predicates; this crate only fixes their shape and defaults.

use serde::{Deserialize, Serialize};

/// Default page size when `per_page` is absent.
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Upper bound on `per_page`, matching the largest advertised pager option.
pub const MAX_PER_PAGE: u64 = 100;

/// Default sort field for every resource.
pub const DEFAULT_ORDER_BY: &str = "date_created";

/// Comparison operator applied to a filter field.
///
/// One operator is supplied per request (the `op` parameter) and applied
/// uniformly to every filter field in that request; each term still carries
/// its own copy so a per-field surface stays a local change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    #[serde(alias = "btw")]
    Between,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
            FilterOperator::Between => "between",
        }
    }
}

impl Default for FilterOperator {
    fn default() -> Self {
        FilterOperator::Eq
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(FilterOperator::Eq),
            "neq" => Ok(FilterOperator::Neq),
            "gt" => Ok(FilterOperator::Gt),
            "gte" => Ok(FilterOperator::Gte),
            "lt" => Ok(FilterOperator::Lt),
            "lte" => Ok(FilterOperator::Lte),
            "in" => Ok(FilterOperator::In),
            // `btw` is the wire spelling kept for client compatibility
            "btw" | "between" => Ok(FilterOperator::Between),
            other => Err(format!("unknown filter operator: {}", other)),
        }
    }
}

/// One `(field, operator, values)` constraint narrowing a collection query.
///
/// Values arrive as raw strings; the storage layer coerces them against the
/// target column's declared type when building the predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTerm {
    pub field: String,
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl FilterTerm {
    pub fn new(field: impl Into<String>, operator: FilterOperator, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            values,
        }
    }
}

/// Sort direction, parsed case-insensitively from `asc_desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Desc
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

/// Requested ordering, validated against a per-resource allow-list before
/// it is ever applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: DEFAULT_ORDER_BY.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Page bounds for a collection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
    /// When set, an out-of-range page is an error instead of being clamped.
    pub error_out: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            error_out: false,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page,
            error_out: false,
        }
    }

    /// Reject bounds a client should never send.
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be greater than 0".to_string());
        }
        if self.per_page == 0 {
            return Err("per_page must be greater than 0".to_string());
        }
        if self.per_page > MAX_PER_PAGE {
            return Err(format!("per_page must not exceed {}", MAX_PER_PAGE));
        }
        Ok(())
    }
}

/// Pagination metadata computed against the filtered query, never the
/// unfiltered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    /// Compute metadata for `total` matching items viewed at `page`.
    ///
    /// `page` is assumed already clamped or validated; `has_next` holds
    /// exactly when `page < pages`.
    pub fn compute(total: u64, page: u64, per_page: u64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1 && total > 0,
        }
    }

    pub fn next_page(&self) -> Option<u64> {
        self.has_next.then_some(self.page + 1)
    }

    pub fn prev_page(&self) -> Option<u64> {
        self.has_prev.then_some(self.page - 1)
    }
}

/// One executed page: the window of items plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_parsing_accepts_wire_spellings() {
        assert_eq!("eq".parse::<FilterOperator>().unwrap(), FilterOperator::Eq);
        assert_eq!("btw".parse::<FilterOperator>().unwrap(), FilterOperator::Between);
        assert_eq!(
            "BETWEEN".parse::<FilterOperator>().unwrap(),
            FilterOperator::Between
        );
        assert!("like".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn direction_parsing_is_case_insensitive() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("Desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("descending".parse::<SortDirection>().is_err());
    }

    #[test]
    fn page_request_bounds() {
        assert!(PageRequest::default().validate().is_ok());
        assert!(PageRequest::new(0, 20).validate().is_err());
        assert!(PageRequest::new(1, 0).validate().is_err());
        assert!(PageRequest::new(1, MAX_PER_PAGE + 1).validate().is_err());
    }

    #[test]
    fn page_meta_invariants() {
        let meta = PageMeta::compute(45, 1, 20);
        assert_eq!(meta.total, 45);
        assert_eq!(meta.pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_prev);

        let last = PageMeta::compute(45, 3, 20);
        assert!(!last.has_next);
        assert!(last.has_prev);
        assert_eq!(last.next_page(), None);
        assert_eq!(last.prev_page(), Some(2));

        let empty = PageMeta::compute(0, 1, 20);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }
}

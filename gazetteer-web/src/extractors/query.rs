//! List-query extraction
//!
//! Decodes the full collection query surface from the raw query string:
//! paging (`page`, `per_page`), sorting (`order_by`, `asc_desc`), search
//! (`query`, `id`), the request operator (`op`), bulk arguments
//! (`group_ids`, `action_name`) and every remaining pair as a candidate
//! filter field. The raw pairs are kept so pagination cursors can be
//! rebuilt with only `page` rewritten.

use axum::{extract::FromRequestParts, http::request::Parts};
use gazetteer_api_types::{
    FilterOperator, FilterTerm, PageRequest, SortDirection, SortSpec, DEFAULT_ORDER_BY,
    DEFAULT_PER_PAGE,
};

use crate::errors::WebError;

/// Query-string keys the engine itself consumes; everything else is a
/// filter field candidate.
const RESERVED_KEYS: &[&str] = &[
    "page",
    "per_page",
    "order_by",
    "asc_desc",
    "query",
    "id",
    "op",
    "group_ids",
    "action_name",
];

/// Free-text and by-id search arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArgs {
    pub query: Option<String>,
    pub id: Option<String>,
}

/// The decoded query surface of one collection or bulk request.
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub paging: PageRequest,
    pub sort: SortSpec,
    pub search: SearchArgs,
    /// One operator per request, applied uniformly to every filter field.
    pub op: FilterOperator,
    /// Remaining `(field, values)` pairs in arrival order; values from
    /// repeated keys accumulate.
    pub filters: Vec<(String, Vec<String>)>,
    pub group_ids: Vec<i64>,
    pub action_name: Option<String>,
    /// The original decoded pairs, kept for cursor rebuilding.
    pub raw_pairs: Vec<(String, String)>,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            paging: PageRequest::default(),
            sort: SortSpec::default(),
            search: SearchArgs::default(),
            op: FilterOperator::default(),
            filters: Vec::new(),
            group_ids: Vec::new(),
            action_name: None,
            raw_pairs: Vec::new(),
        }
    }
}

impl ListArgs {
    /// Parse a raw query string. Bad values for engine-owned keys are
    /// client errors; unrecognized keys are collected as filter fields for
    /// the resource layer to validate.
    pub fn parse(query: &str) -> Result<Self, WebError> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut args = ListArgs {
            raw_pairs: pairs.clone(),
            ..Default::default()
        };
        let mut page: u64 = 1;
        let mut per_page: u64 = DEFAULT_PER_PAGE;
        let mut order_by = DEFAULT_ORDER_BY.to_string();
        let mut direction = SortDirection::Desc;

        for (key, value) in &pairs {
            match key.as_str() {
                "page" => {
                    page = value
                        .parse()
                        .map_err(|_| WebError::bad_request(format!("invalid page: '{}'", value)))?;
                }
                "per_page" => {
                    per_page = value.parse().map_err(|_| {
                        WebError::bad_request(format!("invalid per_page: '{}'", value))
                    })?;
                }
                "order_by" => order_by = value.clone(),
                "asc_desc" => {
                    direction = value.parse().map_err(WebError::bad_request)?;
                }
                "query" => args.search.query = non_empty(value),
                "id" => args.search.id = non_empty(value),
                "op" => {
                    args.op = value.parse().map_err(WebError::bad_request)?;
                }
                "group_ids" => {
                    let id: i64 = value.parse().map_err(|_| {
                        WebError::bad_request(format!("invalid group_ids value: '{}'", value))
                    })?;
                    args.group_ids.push(id);
                }
                "action_name" => args.action_name = non_empty(value),
                _ => match args.filters.iter_mut().find(|(field, _)| field == key) {
                    Some((_, values)) => values.push(value.clone()),
                    None => args.filters.push((key.clone(), vec![value.clone()])),
                },
            }
        }

        args.paging = PageRequest::new(page, per_page);
        args.paging.validate().map_err(WebError::bad_request)?;
        args.sort = SortSpec::new(order_by, direction);

        Ok(args)
    }

    /// Expand the collected filter fields into raw filter terms carrying
    /// the request operator. Multi-value operators additionally split each
    /// value on commas, so `population=10,20&op=btw` works the same as a
    /// repeated key.
    pub fn filter_terms(&self) -> Vec<FilterTerm> {
        let multi = matches!(self.op, FilterOperator::In | FilterOperator::Between);
        self.filters
            .iter()
            .map(|(field, values)| {
                let values = if multi {
                    values
                        .iter()
                        .flat_map(|v| v.split(','))
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect()
                } else {
                    values.clone()
                };
                FilterTerm::new(field.clone(), self.op, values)
            })
            .collect()
    }

    /// Rebuild the request's query string with only `page` rewritten,
    /// rendered as a `?`-prefixed fragment.
    pub fn page_cursor(&self, page: u64) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let mut seen_page = false;
        for (key, value) in &self.raw_pairs {
            if key == "page" {
                if !seen_page {
                    serializer.append_pair("page", &page.to_string());
                    seen_page = true;
                }
            } else {
                serializer.append_pair(key, value);
            }
        }
        if !seen_page {
            serializer.append_pair("page", &page.to_string());
        }
        format!("?{}", serializer.finish())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for ListArgs
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        ListArgs::parse(parts.uri.query().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_contract() {
        let args = ListArgs::parse("").unwrap();
        assert_eq!(args.paging.page, 1);
        assert_eq!(args.paging.per_page, DEFAULT_PER_PAGE);
        assert_eq!(args.sort.field, "date_created");
        assert_eq!(args.sort.direction, SortDirection::Desc);
        assert_eq!(args.op, FilterOperator::Eq);
    }

    #[test]
    fn unknown_direction_and_operator_are_rejected() {
        assert!(ListArgs::parse("asc_desc=sideways").is_err());
        assert!(ListArgs::parse("op=like").is_err());
        // case-insensitive direction parsing is accepted
        let args = ListArgs::parse("asc_desc=ASC").unwrap();
        assert_eq!(args.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn residual_pairs_become_filters() {
        let args = ListArgs::parse("enabled=true&country_id=3&country_id=4&page=2").unwrap();
        assert_eq!(args.paging.page, 2);
        assert_eq!(
            args.filters,
            vec![
                ("enabled".to_string(), vec!["true".to_string()]),
                ("country_id".to_string(), vec!["3".to_string(), "4".to_string()]),
            ]
        );
    }

    #[test]
    fn multi_value_operators_split_commas() {
        let args = ListArgs::parse("population=10,20&op=btw").unwrap();
        let terms = args.filter_terms();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].operator, FilterOperator::Between);
        assert_eq!(terms[0].values, vec!["10".to_string(), "20".to_string()]);
    }

    #[test]
    fn group_ids_accumulate() {
        let args = ListArgs::parse("group_ids=1&group_ids=2&group_ids=3").unwrap();
        assert_eq!(args.group_ids, vec![1, 2, 3]);
        assert!(ListArgs::parse("group_ids=x").is_err());
    }

    #[test]
    fn cursor_rewrites_only_the_page() {
        let args = ListArgs::parse("enabled=true&page=2&per_page=10&op=eq").unwrap();
        let cursor = args.page_cursor(3);
        assert_eq!(cursor, "?enabled=true&page=3&per_page=10&op=eq");
    }

    #[test]
    fn cursor_appends_page_when_absent() {
        let args = ListArgs::parse("enabled=true").unwrap();
        assert_eq!(args.page_cursor(2), "?enabled=true&page=2");
    }

    #[test]
    fn per_page_bounds_are_enforced() {
        assert!(ListArgs::parse("per_page=0").is_err());
        assert!(ListArgs::parse("per_page=500").is_err());
        assert!(ListArgs::parse("page=0").is_err());
    }
}

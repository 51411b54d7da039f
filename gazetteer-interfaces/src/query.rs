//! Query predicate builder and sort resolver
//!
//! A collection request decodes into a set of [`Predicate`]s (conjunctive),
//! an optional free-text [`SearchSpec`] and one [`OrderClause`], bundled as
//! a [`Selection`] the entity service executes against the store.

use gazetteer_api_types::{FilterOperator, FilterTerm, SortSpec};
use thiserror::Error;

use crate::record::{ColumnSet, FieldValue, Record};

/// Client errors raised while translating query arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown filter field: {field}")]
    UnknownFilterField { field: String },

    #[error("unknown sort field: {field}")]
    UnknownSortField { field: String },

    #[error("invalid value for {field}: '{value}' is not {expected}")]
    BadValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("operator '{operator}' requires {expected}")]
    BadArity { operator: String, expected: String },
}

impl QueryError {
    pub fn bad_value(field: &str, value: &str, expected: &str) -> Self {
        QueryError::BadValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// One compiled filter constraint: field resolved, values coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub operator: FilterOperator,
    pub values: Vec<FieldValue>,
}

impl Predicate {
    /// Build a predicate from a raw filter term.
    ///
    /// The field name resolves against the entity's declared columns and
    /// each raw value is coerced to the column's type; any failure is a
    /// client error, never a silent no-op.
    pub fn build(columns: &ColumnSet, term: &FilterTerm) -> Result<Self, QueryError> {
        let column = columns.resolve_filter(&term.field)?;

        match term.operator {
            FilterOperator::In => {
                if term.values.is_empty() {
                    return Err(QueryError::BadArity {
                        operator: "in".to_string(),
                        expected: "at least one value".to_string(),
                    });
                }
            }
            FilterOperator::Between => {
                if term.values.is_empty() || term.values.len() > 2 {
                    return Err(QueryError::BadArity {
                        operator: "between".to_string(),
                        expected: "one or two endpoint values".to_string(),
                    });
                }
            }
            _ => {
                if term.values.is_empty() {
                    return Err(QueryError::BadArity {
                        operator: term.operator.as_str().to_string(),
                        expected: "a value".to_string(),
                    });
                }
            }
        }

        let values = term
            .values
            .iter()
            .map(|raw| column.kind.coerce(&term.field, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            field: term.field.clone(),
            operator: term.operator,
            values,
        })
    }

    /// Whether `record` satisfies this constraint.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        use std::cmp::Ordering;

        let actual = record.field(&self.field);
        match self.operator {
            FilterOperator::Eq => actual == self.values[0],
            FilterOperator::Neq => actual != self.values[0],
            FilterOperator::Gt => {
                matches!(actual.compare(&self.values[0]), Some(Ordering::Greater))
            }
            FilterOperator::Gte => matches!(
                actual.compare(&self.values[0]),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::Lt => matches!(actual.compare(&self.values[0]), Some(Ordering::Less)),
            FilterOperator::Lte => matches!(
                actual.compare(&self.values[0]),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOperator::In => self.values.contains(&actual),
            FilterOperator::Between => {
                // inclusive [start, end]; a single endpoint means [start, +inf)
                let after_start = matches!(
                    actual.compare(&self.values[0]),
                    Some(Ordering::Greater | Ordering::Equal)
                );
                let before_end = match self.values.get(1) {
                    Some(end) => matches!(
                        actual.compare(end),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                    None => true,
                };
                after_start && before_end
            }
        }
    }
}

/// Free-text search over a resource's declared searchable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    pub needle: String,
    pub fields: Vec<String>,
}

impl SearchSpec {
    pub fn new(needle: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            needle: needle.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Case-insensitive containment over any searchable field.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let needle = self.needle.to_lowercase();
        self.fields.iter().any(|field| match record.field(field) {
            FieldValue::Text(text) => text.to_lowercase().contains(&needle),
            FieldValue::Integer(n) => n.to_string() == needle,
            _ => false,
        })
    }
}

/// A resolved ordering clause, applied exactly once as the final stage
/// before pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub field: String,
    pub direction: gazetteer_api_types::SortDirection,
}

impl OrderClause {
    /// Resolve a requested sort against the resource's allow-list and the
    /// entity's declared columns. Unknown fields are rejected, not ignored.
    pub fn resolve(
        allowed: &[&str],
        columns: &ColumnSet,
        spec: &SortSpec,
    ) -> Result<Self, QueryError> {
        if !allowed.contains(&spec.field.as_str()) {
            return Err(QueryError::UnknownSortField {
                field: spec.field.clone(),
            });
        }
        columns.resolve_sort(&spec.field)?;

        Ok(Self {
            field: spec.field.clone(),
            direction: spec.direction,
        })
    }

    /// Total order over records: the sort field first, primary key as the
    /// tie-breaker so ordering is deterministic.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> std::cmp::Ordering {
        use gazetteer_api_types::SortDirection;

        let ordering = a
            .field(&self.field)
            .compare(&b.field(&self.field))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id().cmp(&b.id()));

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A complete compiled collection query: conjunctive predicates, optional
/// search, one ordering.
#[derive(Debug, Clone)]
pub struct Selection {
    pub predicates: Vec<Predicate>,
    pub search: Option<SearchSpec>,
    pub order: OrderClause,
}

impl Selection {
    pub fn new(order: OrderClause) -> Self {
        Self {
            predicates: Vec::new(),
            search: None,
            order,
        }
    }

    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn with_search(mut self, search: Option<SearchSpec>) -> Self {
        self.search = search;
        self
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
            && self.search.as_ref().map_or(true, |s| s.matches(record))
    }

    /// Filter and order a full row set. The store executes this against its
    /// table snapshot; totals computed downstream therefore reflect the
    /// filtered query, not the unfiltered table.
    pub fn apply<R: Record>(&self, rows: Vec<R>) -> Vec<R> {
        let mut matched: Vec<R> = rows.into_iter().filter(|r| self.matches(r)).collect();
        matched.sort_by(|a, b| self.order.compare(a, b));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ColumnKind, ColumnSpec};
    use chrono::{DateTime, Utc};
    use gazetteer_api_types::SortDirection;

    #[derive(Debug, Clone)]
    struct Sample {
        id: i64,
        name: String,
        population: i64,
        created: DateTime<Utc>,
    }

    static SAMPLE_COLUMNS: ColumnSet = ColumnSet::new(&[
        ColumnSpec::new("id", ColumnKind::Integer),
        ColumnSpec::new("name", ColumnKind::Text),
        ColumnSpec::new("population", ColumnKind::Integer),
        ColumnSpec::new("date_created", ColumnKind::Timestamp),
    ]);

    impl Record for Sample {
        fn entity_name() -> &'static str {
            "sample"
        }

        fn columns() -> &'static ColumnSet {
            &SAMPLE_COLUMNS
        }

        fn id(&self) -> i64 {
            self.id
        }

        fn date_created(&self) -> DateTime<Utc> {
            self.created
        }

        fn last_updated(&self) -> DateTime<Utc> {
            self.created
        }

        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => self.id.into(),
                "name" => self.name.clone().into(),
                "population" => self.population.into(),
                "date_created" => self.created.into(),
                _ => FieldValue::Null,
            }
        }
    }

    fn sample(id: i64, name: &str, population: i64) -> Sample {
        Sample {
            id,
            name: name.to_string(),
            population,
            created: Utc::now(),
        }
    }

    fn term(field: &str, op: FilterOperator, values: &[&str]) -> FilterTerm {
        FilterTerm::new(field, op, values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn unknown_filter_field_is_rejected() {
        let err = Predicate::build(
            &SAMPLE_COLUMNS,
            &term("altitude", FilterOperator::Eq, &["10"]),
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::UnknownFilterField { .. }));
    }

    #[test]
    fn between_is_inclusive_and_open_ended() {
        let closed = Predicate::build(
            &SAMPLE_COLUMNS,
            &term("population", FilterOperator::Between, &["10", "20"]),
        )
        .unwrap();
        assert!(closed.matches(&sample(1, "a", 10)));
        assert!(closed.matches(&sample(2, "b", 20)));
        assert!(!closed.matches(&sample(3, "c", 21)));

        let open = Predicate::build(
            &SAMPLE_COLUMNS,
            &term("population", FilterOperator::Between, &["10"]),
        )
        .unwrap();
        assert!(open.matches(&sample(4, "d", 10)));
        assert!(open.matches(&sample(5, "e", 5000)));
        assert!(!open.matches(&sample(6, "f", 9)));
    }

    #[test]
    fn in_requires_values_and_matches_membership() {
        let err = Predicate::build(&SAMPLE_COLUMNS, &term("id", FilterOperator::In, &[]));
        assert!(err.is_err());

        let p = Predicate::build(&SAMPLE_COLUMNS, &term("id", FilterOperator::In, &["1", "3"])).unwrap();
        assert!(p.matches(&sample(1, "a", 0)));
        assert!(!p.matches(&sample(2, "b", 0)));
    }

    #[test]
    fn sort_allow_list_is_enforced() {
        let spec = SortSpec::new("population", SortDirection::Asc);
        assert!(OrderClause::resolve(&["name"], &SAMPLE_COLUMNS, &spec).is_err());

        let clause =
            OrderClause::resolve(&["population"], &SAMPLE_COLUMNS, &spec).unwrap();
        let mut rows = vec![sample(1, "a", 30), sample(2, "b", 10), sample(3, "c", 20)];
        rows.sort_by(|a, b| clause.compare(a, b));
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn selection_is_conjunctive() {
        let order = OrderClause::resolve(
            &["id"],
            &SAMPLE_COLUMNS,
            &SortSpec::new("id", SortDirection::Asc),
        )
        .unwrap();
        let selection = Selection::new(order).with_predicates(vec![
            Predicate::build(
                &SAMPLE_COLUMNS,
                &term("population", FilterOperator::Gte, &["10"]),
            )
            .unwrap(),
            Predicate::build(
                &SAMPLE_COLUMNS,
                &term("population", FilterOperator::Lt, &["30"]),
            )
            .unwrap(),
        ]);

        let rows = vec![sample(1, "a", 5), sample(2, "b", 10), sample(3, "c", 30)];
        let matched = selection.apply(rows);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, 2);
    }

    #[test]
    fn search_matches_any_field_case_insensitively() {
        let search = SearchSpec::new("LAG", &["name"]);
        assert!(search.matches(&sample(1, "Lagos", 0)));
        assert!(!search.matches(&sample(2, "Abuja", 0)));
    }
}

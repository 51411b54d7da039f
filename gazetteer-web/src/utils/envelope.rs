//! Collection response envelope
//!
//! Every collection and sub-collection endpoint renders through the same
//! envelope: the executed query's echo (`order_by`, `asc_desc`, `op`), the
//! page metadata, client-UI option descriptors (`pagers`, `filters`,
//! `sorters`) and next/previous cursors rebuilt from the original request
//! with only `page` rewritten.

use gazetteer_api_types::PageMeta;
use serde::{Deserialize, Serialize};

use crate::extractors::ListArgs;

/// A `{name, value}` option descriptor for client-side UI controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionEntry {
    pub name: String,
    pub value: serde_json::Value,
}

impl OptionEntry {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Default page-size options advertised to clients.
pub fn default_pagers() -> Vec<OptionEntry> {
    [5u64, 10, 20, 50, 100]
        .iter()
        .map(|v| OptionEntry::new(v.to_string(), *v))
        .collect()
}

/// Default sort options advertised to clients.
pub fn default_sorters() -> Vec<OptionEntry> {
    vec![
        OptionEntry::new("ID", "id"),
        OptionEntry::new("Name", "name"),
        OptionEntry::new("Date Created", "date_created"),
        OptionEntry::new("Last Updated", "last_updated"),
    ]
}

/// The uniform collection response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEnvelope {
    pub endpoint: String,
    pub order_by: String,
    pub asc_desc: String,
    pub page: u64,
    pub total: u64,
    pub pages: u64,
    pub per_page: u64,
    pub op: String,
    pub pagers: Vec<OptionEntry>,
    pub filters: Vec<serde_json::Value>,
    pub sorters: Vec<OptionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<String>,
    pub results: Vec<serde_json::Value>,
}

impl CollectionEnvelope {
    /// Assemble the envelope for one executed page.
    ///
    /// Cursors reuse the request's full parameter set so filters, sorting
    /// and search persist across pagination.
    pub fn build(
        endpoint: &str,
        args: &ListArgs,
        meta: PageMeta,
        results: Vec<serde_json::Value>,
        pagers: Vec<OptionEntry>,
        filters: Vec<serde_json::Value>,
        sorters: Vec<OptionEntry>,
    ) -> Self {
        let next = meta.next_page();
        let prev = meta.prev_page();

        Self {
            endpoint: endpoint.to_string(),
            order_by: args.sort.field.clone(),
            asc_desc: args.sort.direction.to_string(),
            page: meta.page,
            total: meta.total,
            pages: meta.pages,
            per_page: meta.per_page,
            op: args.op.to_string(),
            pagers,
            filters,
            sorters,
            next,
            next_page: next.map(|p| args.page_cursor(p)),
            prev,
            prev_page: prev.map(|p| args.page_cursor(p)),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_cursors_only_where_pages_exist() {
        let args = ListArgs::parse("per_page=20&enabled=true").unwrap();
        let meta = PageMeta::compute(45, 1, 20);
        let envelope = CollectionEnvelope::build(
            "countries",
            &args,
            meta,
            Vec::new(),
            default_pagers(),
            Vec::new(),
            default_sorters(),
        );

        assert_eq!(envelope.total, 45);
        assert_eq!(envelope.pages, 3);
        assert_eq!(envelope.next, Some(2));
        assert_eq!(
            envelope.next_page.as_deref(),
            Some("?per_page=20&enabled=true&page=2")
        );
        assert_eq!(envelope.prev, None);
        assert_eq!(envelope.prev_page, None);
    }

    #[test]
    fn last_page_has_only_prev() {
        let args = ListArgs::parse("page=3&per_page=20").unwrap();
        let meta = PageMeta::compute(45, 3, 20);
        let envelope = CollectionEnvelope::build(
            "countries",
            &args,
            meta,
            Vec::new(),
            default_pagers(),
            Vec::new(),
            default_sorters(),
        );
        assert_eq!(envelope.next, None);
        assert_eq!(envelope.prev, Some(2));
        assert_eq!(envelope.prev_page.as_deref(), Some("?page=2&per_page=20"));
    }
}

//! The generic resource controller
//!
//! One [`Resource`] per entity type implements the uniform request
//! lifecycle: list, fetch-by-id, create, update, named detail actions,
//! group actions, single and bulk delete, and sub-collection dispatch.
//! The operation is keyed by the presence of `(object id, sub-resource
//! name, group ids)` exactly as the route table documents:
//!
//! | id | sub | group_ids | operation |
//! |----|-----|-----------|-----------|
//! | -  | -   | -         | GET list / POST create |
//! | x  | -   | -         | GET fetch / POST,PUT update / DELETE destroy |
//! | x  | x   | -         | GET sub-collection / POST named action |
//! | -  | -   | x         | POST group action / DELETE bulk delete |
//!
//! Customization points are explicit strategies injected at registration
//! (permission policy, query scope, data adjuster) plus the action
//! registry and sub-resource table. Writes uniformly return 201,
//! deliberately including deletes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use gazetteer_api_types::{FilterOperator, FilterTerm, PageMeta, PageRequest};
use gazetteer_interfaces::{
    Actor, AllowAll, DataAdjuster, EntityService, NoAdjustment, OrderClause, PermissionPolicy,
    Predicate, QueryScope, Record, SearchSpec, Selection, Unscoped,
};
use gazetteer_web::utils::envelope::{default_pagers, default_sorters};
use gazetteer_web::{CollectionEnvelope, CurrentActor, ListArgs, OptionEntry, WritePayload};

use crate::actions::ActionRegistry;
use crate::errors::{RestError, RestResult};
use crate::forms::{attrs_from_json, FormSchema};
use crate::serializer::Serializer;

/// Collection-query configuration shared by resources and sub-resources.
pub struct CollectionOptions {
    /// Sort allow-list; unknown `order_by` values are rejected.
    pub sortable: Vec<&'static str>,
    /// Fields the free-text `query` parameter searches.
    pub searchable: Vec<&'static str>,
    /// Filter-field allow-list; unknown filter keys are rejected.
    pub filterable: Vec<&'static str>,
    /// Page-size options advertised in the envelope.
    pub pagers: Vec<OptionEntry>,
    /// Sort options advertised in the envelope.
    pub sorters: Vec<OptionEntry>,
    /// Filter descriptors advertised in the envelope.
    pub filter_options: Vec<Value>,
    /// Reject out-of-range pages instead of clamping.
    pub error_out_of_range: bool,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            sortable: vec!["id", "name", "date_created", "last_updated"],
            searchable: Vec::new(),
            filterable: Vec::new(),
            pagers: default_pagers(),
            sorters: default_sorters(),
            filter_options: Vec::new(),
            error_out_of_range: false,
        }
    }
}

/// Execute the page window over the filtered, ordered row set.
///
/// Totals are computed from the rows the selection produced, never the
/// unfiltered table. The page is clamped into range unless the resource
/// opted into `error_out_of_range`.
fn paginate<R>(
    rows: Vec<R>,
    paging: &PageRequest,
    error_out_of_range: bool,
) -> RestResult<(Vec<R>, PageMeta)> {
    let total = rows.len() as u64;
    let per_page = paging.per_page;
    let pages = if total == 0 { 0 } else { total.div_ceil(per_page) };

    let page = if error_out_of_range {
        if paging.page > pages.max(1) {
            return Err(RestError::not_found(format!(
                "page {} is out of range",
                paging.page
            )));
        }
        paging.page
    } else {
        paging.page.min(pages.max(1))
    };

    let meta = PageMeta::compute(total, page, per_page);
    let start = ((page - 1) * per_page) as usize;
    let items = rows
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();
    Ok((items, meta))
}

/// Compile the request's scope, filters, search and sort into a selection.
fn build_selection<R: Record>(
    options: &CollectionOptions,
    scope_terms: &[FilterTerm],
    args: &ListArgs,
) -> RestResult<Selection> {
    let columns = R::columns();
    let order = OrderClause::resolve(&options.sortable, columns, &args.sort)?;
    let mut selection = Selection::new(order);

    for term in scope_terms {
        selection.push(Predicate::build(columns, term)?);
    }

    for term in args.filter_terms() {
        if !options.filterable.contains(&term.field.as_str()) {
            return Err(RestError::bad_request(format!(
                "unknown filter field: {}",
                term.field
            )));
        }
        selection.push(Predicate::build(columns, &term)?);
    }

    // the `id` parameter is a search-by-id shortcut
    if let Some(raw_id) = &args.search.id {
        let term = FilterTerm::new("id", FilterOperator::Eq, vec![raw_id.clone()]);
        selection.push(Predicate::build(columns, &term)?);
    }

    if let Some(needle) = &args.search.query {
        if !options.searchable.is_empty() {
            selection = selection.with_search(Some(SearchSpec::new(
                needle.clone(),
                &options.searchable,
            )));
        }
    }

    Ok(selection)
}

/// Run one collection query end to end: compile, select, paginate, render.
async fn run_collection_query<S: EntityService>(
    endpoint: &str,
    service: &S,
    serializer: &Serializer<S::Record>,
    options: &CollectionOptions,
    scope_terms: &[FilterTerm],
    args: &ListArgs,
) -> RestResult<CollectionEnvelope> {
    let selection = build_selection::<S::Record>(options, scope_terms, args)?;
    let rows = service.select(&selection).await?;
    let (items, meta) = paginate(rows, &args.paging, options.error_out_of_range)?;
    let results = items.iter().map(|r| serializer.render(r)).collect();
    Ok(CollectionEnvelope::build(
        endpoint,
        args,
        meta,
        results,
        options.pagers.clone(),
        options.filter_options.clone(),
        options.sorters.clone(),
    ))
}

/// A secondary collection addressable under a parent's detail route,
/// backed by its own query/service/serializer triple.
#[async_trait::async_trait]
pub trait SubCollection: Send + Sync {
    async fn list(
        &self,
        parent_id: i64,
        actor: Option<&Actor>,
        args: &ListArgs,
    ) -> RestResult<CollectionEnvelope>;
}

/// The standard sub-collection: the child rows whose `parent_column`
/// points at the parent id, rendered through the child's serializer in the
/// same envelope shape as any collection.
pub struct SubResource<S: EntityService> {
    pub endpoint: &'static str,
    pub service: Arc<S>,
    pub serializer: Serializer<S::Record>,
    pub parent_column: &'static str,
    pub options: CollectionOptions,
}

#[async_trait::async_trait]
impl<S: EntityService> SubCollection for SubResource<S> {
    async fn list(
        &self,
        parent_id: i64,
        _actor: Option<&Actor>,
        args: &ListArgs,
    ) -> RestResult<CollectionEnvelope> {
        let scope = [FilterTerm::new(
            self.parent_column,
            FilterOperator::Eq,
            vec![parent_id.to_string()],
        )];
        run_collection_query(
            self.endpoint,
            self.service.as_ref(),
            &self.serializer,
            &self.options,
            &scope,
            args,
        )
        .await
    }
}

/// One registered resource: the service, serializer, schemas, strategy
/// hooks, actions and sub-resources behind a route group.
pub struct Resource<S: EntityService> {
    pub name: &'static str,
    pub service: Arc<S>,
    pub serializer: Serializer<S::Record>,
    pub create_schema: FormSchema,
    pub update_schema: FormSchema,
    pub permission: Arc<dyn PermissionPolicy<S::Record>>,
    pub scope: Arc<dyn QueryScope>,
    pub adjuster: Arc<dyn DataAdjuster>,
    pub actions: ActionRegistry<S>,
    pub sub_resources: HashMap<&'static str, Arc<dyn SubCollection>>,
    pub options: CollectionOptions,
    /// Detail-style resource: the first matching record is returned
    /// directly instead of a page, or 404 when nothing matches.
    pub first_result_only: bool,
}

impl<S: EntityService> Resource<S> {
    pub fn new(
        name: &'static str,
        service: Arc<S>,
        serializer: Serializer<S::Record>,
        create_schema: FormSchema,
        update_schema: FormSchema,
    ) -> Self {
        Self {
            name,
            service,
            serializer,
            create_schema,
            update_schema,
            permission: Arc::new(AllowAll),
            scope: Arc::new(Unscoped),
            adjuster: Arc::new(NoAdjustment),
            actions: ActionRegistry::new(),
            sub_resources: HashMap::new(),
            options: CollectionOptions::default(),
            first_result_only: false,
        }
    }

    pub fn with_options(mut self, options: CollectionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_permission(mut self, permission: Arc<dyn PermissionPolicy<S::Record>>) -> Self {
        self.permission = permission;
        self
    }

    pub fn with_scope(mut self, scope: Arc<dyn QueryScope>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_adjuster(mut self, adjuster: Arc<dyn DataAdjuster>) -> Self {
        self.adjuster = adjuster;
        self
    }

    pub fn with_actions(mut self, actions: ActionRegistry<S>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_sub_resource(
        mut self,
        name: &'static str,
        sub_resource: Arc<dyn SubCollection>,
    ) -> Self {
        self.sub_resources.insert(name, sub_resource);
        self
    }

    pub fn first_result_only(mut self) -> Self {
        self.first_result_only = true;
        self
    }

    /// Current column values of a record, used to seed update validation.
    fn seed_attrs(record: &S::Record) -> gazetteer_interfaces::AttrMap {
        S::Record::columns()
            .names()
            .map(|name| (name.to_string(), record.field(name)))
            .collect()
    }

    /// Validate a payload against a schema and run the adjustment hook.
    fn validate(
        &self,
        schema: &FormSchema,
        payload: &Value,
        seed: Option<&gazetteer_interfaces::AttrMap>,
        actor: Option<&Actor>,
    ) -> RestResult<gazetteer_interfaces::AttrMap> {
        match schema.validate(payload, seed) {
            Ok(mut attrs) => {
                self.adjuster.adjust(actor, &mut attrs);
                Ok(attrs)
            }
            Err(fields) => Err(RestError::Validation { fields }),
        }
    }

    /// List path: permission, scope, filters, sort, page, envelope.
    pub async fn execute_list(&self, actor: Option<&Actor>, args: &ListArgs) -> RestResult<Response> {
        self.permission.check_collection(actor)?;
        let scope_terms = self.scope.scope(actor);

        if self.first_result_only {
            let selection = build_selection::<S::Record>(&self.options, &scope_terms, args)?;
            let rows = self.service.select(&selection).await?;
            let first = rows
                .into_iter()
                .next()
                .ok_or_else(|| RestError::not_found("Result not found"))?;
            return Ok(Json(self.serializer.render(&first)).into_response());
        }

        let envelope = run_collection_query(
            self.name,
            self.service.as_ref(),
            &self.serializer,
            &self.options,
            &scope_terms,
            args,
        )
        .await?;
        Ok(Json(envelope).into_response())
    }

    pub async fn execute_get(&self, actor: Option<&Actor>, id: i64) -> RestResult<Value> {
        let record = self.service.get(id).await?;
        self.permission.check_record(actor, &record)?;
        Ok(self.serializer.render(&record))
    }

    pub async fn execute_create(&self, actor: Option<&Actor>, payload: &Value) -> RestResult<Value> {
        self.permission.check_collection(actor)?;
        let attrs = self.validate(&self.create_schema, payload, None, actor)?;
        let record = self.service.create(attrs).await?;
        Ok(self.serializer.render(&record))
    }

    pub async fn execute_update(
        &self,
        actor: Option<&Actor>,
        id: i64,
        payload: &Value,
    ) -> RestResult<Value> {
        let existing = self.service.get(id).await?;
        self.permission.check_record(actor, &existing)?;
        let seed = Self::seed_attrs(&existing);
        let attrs = self.validate(&self.update_schema, payload, Some(&seed), actor)?;
        let record = self.service.update(id, attrs).await?;
        Ok(self.serializer.render(&record))
    }

    /// Named detail action: fetch, permission, registry lookup, optional
    /// validation, dispatch.
    pub async fn execute_detail_action(
        &self,
        actor: Option<&Actor>,
        id: i64,
        action_name: &str,
        payload: &Value,
    ) -> RestResult<Value> {
        let existing = self.service.get(id).await?;
        self.permission.check_record(actor, &existing)?;

        let action = self
            .actions
            .detail(action_name)
            .ok_or_else(RestError::action_denied)?;

        let attrs = match &action.schema {
            Some(schema) => self.validate(schema, payload, None, actor)?,
            // no schema registered: the raw payload passes through
            None => attrs_from_json(payload),
        };

        let record = (action.handler)(self.service.clone(), id, attrs).await?;
        Ok(self.serializer.render(&record))
    }

    /// Named group action over a set of ids. A registered action without a
    /// validation schema is denied: group actions never run unvalidated.
    pub async fn execute_group_action(
        &self,
        actor: Option<&Actor>,
        args: &ListArgs,
        payload: &Value,
    ) -> RestResult<(Value, StatusCode)> {
        self.permission.check_collection(actor)?;

        let action_name = args
            .action_name
            .as_deref()
            .ok_or_else(|| RestError::bad_request("action_name is required for group actions"))?;
        let action = self
            .actions
            .group(action_name)
            .ok_or_else(RestError::action_denied)?;
        let schema = action.schema.as_ref().ok_or_else(RestError::action_denied)?;

        let attrs = self.validate(schema, payload, None, actor)?;
        (action.handler)(self.service.clone(), args.group_ids.clone(), attrs).await
    }

    pub async fn execute_delete(&self, actor: Option<&Actor>, id: i64) -> RestResult<()> {
        let existing = self.service.get(id).await?;
        self.permission.check_record(actor, &existing)?;
        self.service.delete(id).await?;
        Ok(())
    }

    /// Bulk delete runs only the collection-level permission check; there
    /// is deliberately no per-item check (trusted back-office surface).
    pub async fn execute_bulk_delete(&self, actor: Option<&Actor>, ids: &[i64]) -> RestResult<u64> {
        self.permission.check_collection(actor)?;
        Ok(self.service.delete_many(ids).await?)
    }

    pub async fn execute_sub_collection(
        &self,
        actor: Option<&Actor>,
        id: i64,
        sub_name: &str,
        args: &ListArgs,
    ) -> RestResult<CollectionEnvelope> {
        let parent = self.service.get(id).await?;
        self.permission.check_record(actor, &parent)?;

        let sub_resource = self
            .sub_resources
            .get(sub_name)
            .ok_or_else(|| RestError::not_found(format!("unknown sub-resource: {}", sub_name)))?;
        sub_resource.list(id, actor, args).await
    }
}

fn parse_id(raw: &str) -> RestResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| RestError::bad_request(format!("invalid id: '{}'", raw)))
}

async fn list_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    args: ListArgs,
) -> RestResult<Response> {
    tracing::debug!(resource = resource.name, "listing collection");
    resource.execute_list(actor.as_ref(), &args).await
}

async fn collection_post_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    args: ListArgs,
    WritePayload(payload): WritePayload,
) -> RestResult<Response> {
    if args.group_ids.is_empty() {
        let body = resource.execute_create(actor.as_ref(), &payload).await?;
        Ok((StatusCode::CREATED, Json(body)).into_response())
    } else {
        let (body, status) = resource
            .execute_group_action(actor.as_ref(), &args, &payload)
            .await?;
        Ok((status, Json(body)).into_response())
    }
}

async fn collection_delete_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    args: ListArgs,
) -> RestResult<Response> {
    if args.group_ids.is_empty() {
        return Err(RestError::bad_request("group_ids is required for bulk delete"));
    }
    let deleted = resource
        .execute_bulk_delete(actor.as_ref(), &args.group_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "deleted": deleted }))).into_response())
}

async fn detail_get_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response> {
    let id = parse_id(&id)?;
    let body = resource.execute_get(actor.as_ref(), id).await?;
    Ok(Json(body).into_response())
}

async fn detail_post_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    WritePayload(payload): WritePayload,
) -> RestResult<Response> {
    let id = parse_id(&id)?;
    let body = resource.execute_update(actor.as_ref(), id, &payload).await?;
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn detail_delete_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> RestResult<Response> {
    let id = parse_id(&id)?;
    resource.execute_delete(actor.as_ref(), id).await?;
    Ok((StatusCode::CREATED, Json(Value::Null)).into_response())
}

async fn sub_get_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    Path((id, sub_name)): Path<(String, String)>,
    args: ListArgs,
) -> RestResult<Response> {
    let id = parse_id(&id)?;
    let envelope = resource
        .execute_sub_collection(actor.as_ref(), id, &sub_name, &args)
        .await?;
    Ok(Json(envelope).into_response())
}

async fn sub_post_handler<S: EntityService>(
    State(resource): State<Arc<Resource<S>>>,
    CurrentActor(actor): CurrentActor,
    Path((id, sub_name)): Path<(String, String)>,
    WritePayload(payload): WritePayload,
) -> RestResult<Response> {
    let id = parse_id(&id)?;
    let body = resource
        .execute_detail_action(actor.as_ref(), id, &sub_name, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// Build the route group for one registered resource.
///
/// PUT is a pure alias for POST on both detail and sub routes.
pub fn resource_routes<S: EntityService>(resource: Resource<S>) -> Router {
    let resource = Arc::new(resource);
    Router::new()
        .route(
            "/",
            get(list_handler::<S>)
                .post(collection_post_handler::<S>)
                .delete(collection_delete_handler::<S>),
        )
        .route(
            "/:id",
            get(detail_get_handler::<S>)
                .post(detail_post_handler::<S>)
                .put(detail_post_handler::<S>)
                .delete(detail_delete_handler::<S>),
        )
        .route(
            "/:id/:sub",
            get(sub_get_handler::<S>)
                .post(sub_post_handler::<S>)
                .put(sub_post_handler::<S>),
        )
        .with_state(resource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_clamps_by_default() {
        let rows: Vec<i64> = (1..=45).collect();
        let (items, meta) = paginate(rows, &PageRequest::new(9, 20), false).unwrap();
        assert_eq!(meta.page, 3);
        assert_eq!(items.len(), 5);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn paginate_rejects_when_asked_to() {
        let rows: Vec<i64> = (1..=45).collect();
        let err = paginate(rows, &PageRequest::new(9, 20), true).unwrap_err();
        assert_eq!(err.to_api_error().http_status(), 404);
    }

    #[test]
    fn paginate_covers_all_rows_without_gaps() {
        let rows: Vec<i64> = (1..=45).collect();
        let mut seen = Vec::new();
        for page in 1..=3 {
            let (items, meta) = paginate(rows.clone(), &PageRequest::new(page, 20), false).unwrap();
            assert_eq!(meta.total, 45);
            assert_eq!(meta.pages, 3);
            seen.extend(items);
        }
        assert_eq!(seen, rows);
    }

    #[test]
    fn empty_collection_is_one_empty_first_page() {
        let (items, meta) = paginate(Vec::<i64>::new(), &PageRequest::default(), false).unwrap();
        assert!(items.is_empty());
        assert_eq!(meta.page, 1);
        assert_eq!(meta.pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[tokio::test]
    async fn first_result_only_bypasses_the_pager() {
        use crate::forms::FormSchema;
        use crate::serializer::{FieldSpec, Serializer};
        use gazetteer_interfaces::AttrMap;
        use gazetteer_storage::{GeoStore, TimezoneService};

        let store = GeoStore::new();
        let service = Arc::new(TimezoneService::new(store));
        for code in ["Alpha", "Beta"] {
            let mut attrs = AttrMap::new();
            attrs.insert("code".to_string(), code.into());
            attrs.insert("name".to_string(), code.into());
            service.create(attrs).await.unwrap();
        }

        let resource = Resource::new(
            "timezones",
            service,
            Serializer::new(vec![FieldSpec::column("code")]),
            FormSchema::empty(),
            FormSchema::empty(),
        )
        .with_options(CollectionOptions {
            filterable: vec!["code"],
            ..Default::default()
        })
        .first_result_only();

        let args = ListArgs::parse("code=Beta").unwrap();
        let response = resource.execute_list(None, &args).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        // a single object, not a page envelope
        assert_eq!(body["code"], "Beta");
        assert!(body.get("results").is_none());

        let args = ListArgs::parse("code=Gamma").unwrap();
        let err = resource.execute_list(None, &args).await.unwrap_err();
        assert_eq!(err.to_api_error().http_status(), 404);
    }
}

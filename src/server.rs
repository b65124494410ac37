//! Demo host pipeline.
//!
//! A small axum router standing in for the host's REST dispatch: fast-sync
//! interception runs first, the full listing (with the query augmenter
//! applied) is the fallback, and store bodies pass through the enricher
//! before they leave. Real deployments bind the bridge into the host's own
//! pipeline instead.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::bridge::{FastSyncResponse, LanguageBridge};
use crate::memory::{ContentRecord, MemoryHost, StoreRecord};
use crate::query::{ContentType, ListingQuery};
use crate::request::ApiRequest;

#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<LanguageBridge>,
    pub host: Arc<MemoryHost>,
}

type QueryPairs = Query<Vec<(String, String)>>;

pub fn router(state: AppState) -> Router {
    let ns = state.bridge.config().api_namespace.clone();
    Router::new()
        .route(&format!("{}/products", ns), get(list_products))
        .route(&format!("{}/products/variations", ns), get(list_variations))
        .route(
            &format!("{}/products/:parent_id/variations", ns),
            get(list_child_variations),
        )
        .route(&format!("{}/stores", ns), get(list_stores))
        .route(&format!("{}/stores/edit-config", ns), get(store_edit_config))
        .route(&format!("{}/stores/:store_id", ns), get(get_store))
        .with_state(state)
}

async fn list_products(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    let route = format!("{}/products", state.bridge.config().api_namespace);
    let request = ApiRequest::from_query_pairs(route, pairs);

    if let Some(fast) = state.bridge.intercept_fast_sync(&request) {
        return fast_sync_response(fast);
    }

    let mut query = ListingQuery::new(ContentType::Product);
    state.bridge.filter_product_query(&mut query, &request);
    listing_response(&state, &query)
}

async fn list_variations(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    let route = format!("{}/products/variations", state.bridge.config().api_namespace);
    let request = ApiRequest::from_query_pairs(route, pairs);

    if let Some(fast) = state.bridge.intercept_fast_sync(&request) {
        return fast_sync_response(fast);
    }

    let mut query = ListingQuery::new(ContentType::ProductVariation);
    state.bridge.filter_variation_query(&mut query, &request);
    listing_response(&state, &query)
}

async fn list_child_variations(
    State(state): State<AppState>,
    Path(parent_id): Path<i64>,
    Query(pairs): QueryPairs,
) -> Response {
    let route = format!(
        "{}/products/{}/variations",
        state.bridge.config().api_namespace,
        parent_id
    );
    let request = ApiRequest::from_query_pairs(route, pairs);

    if let Some(fast) = state.bridge.intercept_fast_sync(&request) {
        return fast_sync_response(fast);
    }

    let mut query = ListingQuery::new(ContentType::ProductVariation);
    query.parent = Some(parent_id);
    state.bridge.filter_variation_query(&mut query, &request);
    listing_response(&state, &query)
}

async fn list_stores(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    let route = format!("{}/stores", state.bridge.config().api_namespace);
    let request = ApiRequest::from_query_pairs(route, pairs);

    let mut body = Value::Array(state.host.stores().iter().map(store_body).collect());
    state.bridge.enrich_store_response(&request, &mut body);
    Json(body).into_response()
}

async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
    Query(pairs): QueryPairs,
) -> Response {
    let route = format!("{}/stores/{}", state.bridge.config().api_namespace, store_id);
    let request = ApiRequest::from_query_pairs(route, pairs);

    let Some(store) = state.host.store(store_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut body = store_body(&store);
    state.bridge.enrich_store_response(&request, &mut body);
    Json(body).into_response()
}

async fn store_edit_config(State(state): State<AppState>) -> Response {
    match state.bridge.store_edit_payload() {
        Some(payload) => Json(payload).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn fast_sync_response(fast: FastSyncResponse) -> Response {
    let headers = [
        ("x-total-count", fast.total.to_string()),
        ("x-total-pages", fast.total_pages.to_string()),
    ];
    (headers, Json(fast.records)).into_response()
}

fn listing_response(state: &AppState, query: &ListingQuery) -> Response {
    let records: Vec<Value> = state
        .host
        .list_records(query)
        .iter()
        .map(content_body)
        .collect();
    Json(records).into_response()
}

fn content_body(record: &ContentRecord) -> Value {
    json!({
        "id": record.id,
        "name": record.name,
        "lang": record.language,
        "date_modified_gmt": record.modified_gmt.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

fn store_body(store: &StoreRecord) -> Value {
    json!({
        "id": store.id,
        "name": store.name,
    })
}

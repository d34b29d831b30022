use std::sync::Arc;

use axum::extract::{Query, State};

use super::{json, ApiResp, Ctx};
use crate::{
    models::{Entry, Health, SearchQuery},
    store::CatalogStore,
};

/// Autocomplete states by name prefix, most popular first. A missing or
/// empty `search` param returns the whole catalog.
pub async fn search<S: CatalogStore>(
    State(ctx): State<Arc<Ctx<S>>>,
    Query(query): Query<SearchQuery>,
) -> ApiResp<Vec<Entry>> {
    log::debug!("searching for: {}", query.search);
    json(ctx.mgr.query(&query.search))
}

/// Index size and store failure counters.
pub async fn health<S: CatalogStore>(State(ctx): State<Arc<Ctx<S>>>) -> ApiResp<Health> {
    json(ctx.mgr.health())
}

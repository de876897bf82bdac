//! Generic list/get/create/update/delete handlers
//!
//! Every entity exposes the same five operations on two paths:
//! a collection path (`/customers/`) for listing and an item path
//! (`/customer/`) keyed by query string for the rest.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;

use crate::catalog::Table;
use crate::db::{EntityRepo, Filter};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, KeyQuery};
use crate::http::server::AppState;
use crate::models::{NaturalKey, Record};
use crate::schema::Entity;

/// Query parameters naming a natural key
pub trait KeyParams: DeserializeOwned + Send + 'static {
    /// Raw values in key column order; absent parameters are empty.
    fn raw(&self) -> Vec<&str>;
}

/// An entity served by the generic handlers
pub trait Resource: Send + Sync + 'static {
    const ENTITY: Entity;

    /// Whether an update may change the natural key
    const RENAMES: bool = false;

    type Key: KeyParams;
}

pub(crate) fn parse_key<K: KeyParams>(table: &Table, params: &K) -> Result<NaturalKey, ApiError> {
    Ok(NaturalKey::parse(table, &params.raw())?)
}

/// GET collection - every row
pub async fn list<R: Resource>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let table = state.catalog.table(R::ENTITY);
    let rows = EntityRepo::new(state.gateway.as_ref(), table)
        .list(&Filter::all())
        .await?;
    Ok(Json(rows))
}

/// GET item - one row by key
pub async fn get_one<R: Resource>(
    State(state): State<Arc<AppState>>,
    KeyQuery(params): KeyQuery<R::Key>,
) -> Result<Json<Record>, ApiError> {
    let table = state.catalog.table(R::ENTITY);
    let key = parse_key(table, &params)?;
    let row = EntityRepo::new(state.gateway.as_ref(), table).get(&key).await?;
    Ok(Json(row))
}

/// POST item - insert a new row
pub async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let table = state.catalog.table(R::ENTITY);
    let record = Record::from_json(table, &body)?;
    let key = NaturalKey::of(table, &record)?;

    let row = EntityRepo::new(state.gateway.as_ref(), table)
        .create(&key, record, &state.audit)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT item - overwrite every declared field of the row at the query key
pub async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    KeyQuery(params): KeyQuery<R::Key>,
    JsonBody(body): JsonBody,
) -> Result<Json<Record>, ApiError> {
    let table = state.catalog.table(R::ENTITY);
    let key = parse_key(table, &params)?;
    let record = Record::from_json(table, &body)?;
    let body_key = NaturalKey::of(table, &record)?;
    let repo = EntityRepo::new(state.gateway.as_ref(), table);

    if body_key != key {
        if !R::RENAMES {
            return Err(ApiError::KeyMismatch {
                resource: table.resource(),
                path: key.to_string(),
                body: body_key.to_string(),
            });
        }
        if !repo.exists(&key).await? {
            return Err(ApiError::NotFound {
                resource: table.resource(),
                id: key.to_string(),
            });
        }
        if repo.exists(&body_key).await? {
            return Err(ApiError::Conflict {
                resource: table.resource(),
                id: body_key.to_string(),
            });
        }
    }

    let row = repo.update(&key, record, &state.audit).await?;
    Ok(Json(row))
}

/// DELETE item
pub async fn delete<R: Resource>(
    State(state): State<Arc<AppState>>,
    KeyQuery(params): KeyQuery<R::Key>,
) -> Result<StatusCode, ApiError> {
    let table = state.catalog.table(R::ENTITY);
    let key = parse_key(table, &params)?;
    EntityRepo::new(state.gateway.as_ref(), table).delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All five operations of `R` on `list_path` and `item_path`.
pub fn router<R: Resource>(list_path: &str, item_path: &str) -> Router<Arc<AppState>> {
    Router::new().route(list_path, get(list::<R>)).route(
        item_path,
        get(get_one::<R>)
            .post(create::<R>)
            .put(update::<R>)
            .delete(delete::<R>),
    )
}

//! Group enrollment endpoints
//!
//! Keyed by customer id and departure date. The collection can be narrowed
//! to one departure with `?date=`.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::crud::{self, KeyParams, Resource};
use crate::db::{EntityRepo, Filter};
use crate::http::error::ApiError;
use crate::http::extractors::KeyQuery;
use crate::http::server::AppState;
use crate::models::{Record, Value};
use crate::schema::{Entity, DEPARTURE_DATE};

pub struct Enrollments;

/// `?customer_id=&date=` (also `?user_id=&group_date=`)
#[derive(Debug, Deserialize)]
pub struct EnrollmentKey {
    #[serde(alias = "user_id")]
    pub customer_id: Option<String>,
    #[serde(alias = "group_date")]
    pub date: Option<String>,
}

impl KeyParams for EnrollmentKey {
    fn raw(&self) -> Vec<&str> {
        vec![
            self.customer_id.as_deref().unwrap_or_default(),
            self.date.as_deref().unwrap_or_default(),
        ]
    }
}

impl Resource for Enrollments {
    const ENTITY: Entity = Entity::Enrollment;
    type Key = EnrollmentKey;
}

/// Optional departure filter for the collection
#[derive(Debug, Deserialize)]
pub struct DateFilter {
    #[serde(alias = "group_date")]
    pub date: Option<String>,
}

/// GET /enrollments/[?date=]
async fn list_enrollments(
    State(state): State<Arc<AppState>>,
    KeyQuery(params): KeyQuery<DateFilter>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let table = state.catalog.table(Entity::Enrollment);

    let mut filter = Filter::all();
    if let (Some(raw), Some(column)) = (params.date.as_deref(), table.column(DEPARTURE_DATE)) {
        if !raw.is_empty() {
            filter = filter.eq(DEPARTURE_DATE, Value::parse(column.name, column.kind, raw)?);
        }
    }

    let rows = EntityRepo::new(state.gateway.as_ref(), table)
        .list(&filter)
        .await?;
    Ok(Json(rows))
}

fn routes(list_path: &str, item_path: &str) -> Router<Arc<AppState>> {
    Router::new().route(list_path, get(list_enrollments)).route(
        item_path,
        get(crud::get_one::<Enrollments>)
            .post(crud::create::<Enrollments>)
            .put(crud::update::<Enrollments>)
            .delete(crud::delete::<Enrollments>),
    )
}

/// Enrollment routes, with the `/groupusers/` aliases
pub fn router() -> Router<Arc<AppState>> {
    routes("/enrollments/", "/enrollment/").merge(routes("/groupusers/", "/groupuser/"))
}

//! Group endpoints
//!
//! Reads carry the enrollment headcount; writes go through the generic
//! handlers and never touch it.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::crud::{self, parse_key, KeyParams, Resource};
use crate::db::GroupRepo;
use crate::http::error::ApiError;
use crate::http::extractors::KeyQuery;
use crate::http::server::AppState;
use crate::models::Record;
use crate::schema::Entity;

pub struct Groups;

/// `?date=` (also `?group_date=`)
#[derive(Debug, Deserialize)]
pub struct GroupKey {
    #[serde(alias = "group_date")]
    pub date: Option<String>,
}

impl KeyParams for GroupKey {
    fn raw(&self) -> Vec<&str> {
        vec![self.date.as_deref().unwrap_or_default()]
    }
}

impl Resource for Groups {
    const ENTITY: Entity = Entity::Group;
    type Key = GroupKey;
}

fn repo(state: &AppState) -> GroupRepo<'_> {
    GroupRepo::new(
        state.gateway.as_ref(),
        state.catalog.table(Entity::Group),
        state.catalog.table(Entity::Enrollment),
    )
}

/// GET /groups/ - every group with its headcount
async fn list_groups(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(repo(&state).list().await?))
}

/// GET /group/?date= - one group with its headcount
async fn get_group(
    State(state): State<Arc<AppState>>,
    KeyQuery(params): KeyQuery<GroupKey>,
) -> Result<Json<Record>, ApiError> {
    let key = parse_key(state.catalog.table(Entity::Group), &params)?;
    Ok(Json(repo(&state).get(&key).await?))
}

/// Group routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/groups/", get(list_groups)).route(
        "/group/",
        get(get_group)
            .post(crud::create::<Groups>)
            .put(crud::update::<Groups>)
            .delete(crud::delete::<Groups>),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::http::testing::{send, test_app};

    #[tokio::test]
    async fn headcount_follows_enrollments() {
        let app = test_app();
        let (status, _) = send(&app, "POST", "/group/", Some(json!({"出團日期": "2025-02-20", "地點": "北海道"}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, group) = send(&app, "GET", "/group/?date=2025-02-20", None).await;
        assert_eq!(group["客戶總數"], 0);

        for id in ["0001", "0002"] {
            let body = json!({"客戶ID": id, "出團日期": "2025-02-20"});
            send(&app, "POST", "/enrollment/", Some(body)).await;
        }

        let (_, groups) = send(&app, "GET", "/groups/", None).await;
        assert_eq!(groups[0]["客戶總數"], 2);
        assert_eq!(groups[0]["地點"], "北海道");
    }

    #[tokio::test]
    async fn headcount_in_body_is_ignored() {
        let app = test_app();
        let body = json!({"出團日期": "2010-05-07", "客戶總數": 40});
        let (_, created) = send(&app, "POST", "/group/", Some(body)).await;
        assert!(created.get("客戶總數").is_none());

        let (_, group) = send(&app, "GET", "/group/?group_date=2010-05-07T00:00:00", None).await;
        assert_eq!(group["客戶總數"], 0);
    }

    #[tokio::test]
    async fn empty_list_is_empty_array() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/groups/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn bad_date_is_validation_error() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/group/?date=tomorrow", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}

//! Currency endpoints

use std::sync::Arc;

use axum::{routing::get, Router};
use serde::Deserialize;

use super::crud::{self, KeyParams, Resource};
use crate::http::server::AppState;
use crate::schema::Entity;

pub struct Currencies;

/// `?name=` (also `?currency_name=`)
#[derive(Debug, Deserialize)]
pub struct CurrencyKey {
    #[serde(alias = "currency_name")]
    pub name: Option<String>,
}

impl KeyParams for CurrencyKey {
    fn raw(&self) -> Vec<&str> {
        vec![self.name.as_deref().unwrap_or_default()]
    }
}

impl Resource for Currencies {
    const ENTITY: Entity = Entity::Currency;
    type Key = CurrencyKey;
}

/// Currency routes; the collection also answers without a trailing slash
pub fn router() -> Router<Arc<AppState>> {
    crud::router::<Currencies>("/currencies/", "/currency/")
        .route("/currencies", get(crud::list::<Currencies>))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::http::testing::{send, send_raw, test_app};

    #[tokio::test]
    async fn numeric_rate_round_trips_as_number() {
        let app = test_app();
        let body = json!({"貨幣名稱": "港幣", "貨幣代碼": "HKD", "預設匯率": "4.1"});
        let (status, created) = send(&app, "POST", "/currency/", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["預設匯率"], 4.1);

        let uri = format!("/currency/?currency_name={}", urlencoding::encode("港幣"));
        let (_, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(fetched["預設匯率"], 4.1);
    }

    #[tokio::test]
    async fn collection_without_trailing_slash() {
        let app = test_app();
        send(&app, "POST", "/currency/", Some(json!({"貨幣名稱": "日圓"}))).await;

        let (status, listed) = send(&app, "GET", "/currencies", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([{"貨幣名稱": "日圓", "貨幣代碼": null, "預設匯率": null}]));
    }

    #[tokio::test]
    async fn wrong_type_is_rejected() {
        let app = test_app();
        let body = json!({"貨幣名稱": "港幣", "預設匯率": "four"});
        let (status, body) = send(&app, "POST", "/currency/", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let app = test_app();
        let (status, body) = send_raw(&app, "POST", "/currency/", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}

//! Customer endpoints

use std::sync::Arc;

use axum::Router;
use serde::Deserialize;

use super::crud::{self, KeyParams, Resource};
use crate::http::server::AppState;
use crate::schema::Entity;

pub struct Customers;

/// `?id=` (also `?user_id=`)
#[derive(Debug, Deserialize)]
pub struct CustomerKey {
    #[serde(alias = "user_id")]
    pub id: Option<String>,
}

impl KeyParams for CustomerKey {
    fn raw(&self) -> Vec<&str> {
        vec![self.id.as_deref().unwrap_or_default()]
    }
}

impl Resource for Customers {
    const ENTITY: Entity = Entity::Customer;
    type Key = CustomerKey;
}

/// Customer routes, with the `/users/` aliases
pub fn router() -> Router<Arc<AppState>> {
    crud::router::<Customers>("/customers/", "/customer/")
        .merge(crud::router::<Customers>("/users/", "/user/"))
}

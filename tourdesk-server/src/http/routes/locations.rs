//! Location endpoints
//!
//! A location is just its name, so an update is a rename.

use std::sync::Arc;

use axum::Router;
use serde::Deserialize;

use super::crud::{self, KeyParams, Resource};
use crate::http::server::AppState;
use crate::schema::Entity;

pub struct Locations;

/// `?name=` (also `?loc=`)
#[derive(Debug, Deserialize)]
pub struct LocationKey {
    #[serde(alias = "loc")]
    pub name: Option<String>,
}

impl KeyParams for LocationKey {
    fn raw(&self) -> Vec<&str> {
        vec![self.name.as_deref().unwrap_or_default()]
    }
}

impl Resource for Locations {
    const ENTITY: Entity = Entity::Location;
    const RENAMES: bool = true;
    type Key = LocationKey;
}

pub fn router() -> Router<Arc<AppState>> {
    crud::router::<Locations>("/locations/", "/location/")
}

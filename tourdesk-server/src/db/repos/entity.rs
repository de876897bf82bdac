//! Generic entity repository
//!
//! Every write follows the same pattern:
//! - existence check by natural key
//! - one statement for the write itself
//!
//! The check and the write are separate calls. A concurrent writer can slip
//! between them; the database's own constraints are the last line.

use chrono::{Local, NaiveDateTime};

use crate::db::gateway::{DbError, Filter, Gateway};
use crate::catalog::Table;
use crate::models::{NaturalKey, Record, Value};

/// Actor id written to audit columns by default
pub const DEFAULT_ACTOR_ID: i64 = 6;

pub const ADD_TIME: &str = "add_time";
pub const ADD_USER_ID: &str = "add_user_id";
pub const UPDATE_TIME: &str = "update_time";
pub const UPDATE_USER_ID: &str = "update_user_id";

/// Audit column policy for audited tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Audit {
    pub actor_id: i64,
}

impl Default for Audit {
    fn default() -> Self {
        Self {
            actor_id: DEFAULT_ACTOR_ID,
        }
    }
}

impl Audit {
    fn stamp_insert(&self, row: &mut Record, now: NaiveDateTime) {
        row.push(ADD_TIME, Value::Timestamp(now));
        row.push(ADD_USER_ID, Value::Integer(self.actor_id));
        row.push(UPDATE_TIME, Value::Timestamp(now));
        row.push(UPDATE_USER_ID, Value::Integer(self.actor_id));
    }

    fn stamp_update(&self, row: &mut Record, now: NaiveDateTime) {
        row.set(UPDATE_TIME, Value::Timestamp(now));
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Repository for one resolved table
pub struct EntityRepo<'a> {
    gateway: &'a dyn Gateway,
    table: &'a Table,
}

impl<'a> EntityRepo<'a> {
    pub fn new(gateway: &'a dyn Gateway, table: &'a Table) -> Self {
        Self { gateway, table }
    }

    fn not_found(&self, key: &NaturalKey) -> DbError {
        DbError::NotFound {
            resource: self.table.resource(),
            id: key.to_string(),
        }
    }

    /// All rows matching `filter`; empty when none match.
    pub async fn list(&self, filter: &Filter) -> Result<Vec<Record>, DbError> {
        Ok(self
            .gateway
            .fetch(self.table, filter)
            .await?
            .unwrap_or_default())
    }

    pub async fn find(&self, key: &NaturalKey) -> Result<Option<Record>, DbError> {
        let rows = self.gateway.fetch(self.table, &Filter::from(key)).await?;
        Ok(rows.and_then(|rows| rows.into_iter().next()))
    }

    /// Get a single row by natural key.
    pub async fn get(&self, key: &NaturalKey) -> Result<Record, DbError> {
        self.find(key).await?.ok_or_else(|| self.not_found(key))
    }

    pub async fn exists(&self, key: &NaturalKey) -> Result<bool, DbError> {
        let found = self.find(key).await?.is_some();
        tracing::debug!(resource = self.table.resource(), key = %key, found, "existence check");
        Ok(found)
    }

    /// Insert `record` under `key`; Conflict if the key is taken.
    ///
    /// Audited tables get all four audit columns.
    pub async fn create(
        &self,
        key: &NaturalKey,
        record: Record,
        audit: &Audit,
    ) -> Result<Record, DbError> {
        if self.exists(key).await? {
            return Err(DbError::Conflict {
                resource: self.table.resource(),
                id: key.to_string(),
            });
        }

        let mut row = record.clone();
        if self.table.schema().audited {
            audit.stamp_insert(&mut row, now());
        }

        self.gateway.insert(self.table, &row).await?;
        tracing::info!(resource = self.table.resource(), key = %key, "created");
        Ok(record)
    }

    /// Overwrite every declared column of the row at `key` with `record`.
    ///
    /// `record` may carry a different key (a rename); callers decide whether
    /// that is allowed. Audited tables get a fresh `update_time`.
    pub async fn update(
        &self,
        key: &NaturalKey,
        record: Record,
        audit: &Audit,
    ) -> Result<Record, DbError> {
        if !self.exists(key).await? {
            return Err(self.not_found(key));
        }

        let mut assignments = record.clone();
        if self.table.schema().audited {
            audit.stamp_update(&mut assignments, now());
        }

        let affected = self
            .gateway
            .update(self.table, &Filter::from(key), &assignments)
            .await?;
        tracing::info!(resource = self.table.resource(), key = %key, affected, "updated");
        Ok(record)
    }

    /// Delete the row at `key`; NotFound if absent.
    pub async fn delete(&self, key: &NaturalKey) -> Result<(), DbError> {
        if !self.exists(key).await? {
            return Err(self.not_found(key));
        }

        let affected = self.gateway.delete(self.table, &Filter::from(key)).await?;
        tracing::info!(resource = self.table.resource(), key = %key, affected, "deleted");
        Ok(())
    }
}

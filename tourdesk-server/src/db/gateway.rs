//! Data-access gateway contract
//!
//! Every call is self-contained: implementations acquire whatever
//! connection they need, run one statement and release it before
//! returning. No statement spans multiple calls.

use async_trait::async_trait;

use crate::catalog::{Column, Table};
use crate::models::{NaturalKey, Record, Value};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("already exists: {resource} '{id}'")]
    Conflict { resource: &'static str, id: String },
}

/// Conjunction of column equality conditions; empty matches every row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(&'static str, Value)>,
}

impl Filter {
    /// Filter matching every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: Value) -> Self {
        self.conditions.push((column, value));
        self
    }

    pub fn conditions(&self) -> &[(&'static str, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether `row` satisfies every condition.
    pub fn matches(&self, row: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column).unwrap_or(&Value::Null) == value)
    }
}

impl From<&NaturalKey> for Filter {
    fn from(key: &NaturalKey) -> Self {
        Self {
            conditions: key.parts().to_vec(),
        }
    }
}

/// Row-level access to the five tables
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Rows matching `filter`, restricted to the table's columns, or `None`
    /// when nothing matches.
    async fn fetch(&self, table: &Table, filter: &Filter) -> Result<Option<Vec<Record>>, DbError>;

    /// Row counts grouped by `column` over rows matching `filter`.
    async fn count_by(
        &self,
        table: &Table,
        column: &Column,
        filter: &Filter,
    ) -> Result<Vec<(Value, i64)>, DbError>;

    /// Insert one row. `row` may carry system columns beyond the table's
    /// declared ones.
    async fn insert(&self, table: &Table, row: &Record) -> Result<(), DbError>;

    /// Assign `assignments` on rows matching `filter`; returns rows affected.
    async fn update(
        &self,
        table: &Table,
        filter: &Filter,
        assignments: &Record,
    ) -> Result<u64, DbError>;

    /// Delete rows matching `filter`; returns rows affected.
    async fn delete(&self, table: &Table, filter: &Filter) -> Result<u64, DbError>;
}

//! In-process gateway
//!
//! Same contract as [`PgGateway`](super::PgGateway) without a database.
//! Used by the router tests and by `serve --in-memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::gateway::{DbError, Filter, Gateway};
use crate::catalog::{Column, Table};
use crate::models::{Record, Value};

/// Tables held in memory, keyed by table name
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<&'static str, Vec<Record>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored rows of one table, system columns included.
    pub async fn raw_rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn fetch(&self, table: &Table, filter: &Filter) -> Result<Option<Vec<Record>>, DbError> {
        let tables = self.tables.read().await;
        let rows: Vec<Record> = tables
            .get(table.name())
            .into_iter()
            .flatten()
            .filter(|row| filter.matches(row))
            .map(|row| row.project(table))
            .collect();

        Ok((!rows.is_empty()).then_some(rows))
    }

    async fn count_by(
        &self,
        table: &Table,
        column: &Column,
        filter: &Filter,
    ) -> Result<Vec<(Value, i64)>, DbError> {
        let tables = self.tables.read().await;
        let mut counts: Vec<(Value, i64)> = Vec::new();

        for row in tables.get(table.name()).into_iter().flatten() {
            if !filter.matches(row) {
                continue;
            }
            let value = row.get(column.name).cloned().unwrap_or(Value::Null);
            match counts.iter_mut().find(|(v, _)| *v == value) {
                Some((_, n)) => *n += 1,
                None => counts.push((value, 1)),
            }
        }

        Ok(counts)
    }

    async fn insert(&self, table: &Table, row: &Record) -> Result<(), DbError> {
        self.tables
            .write()
            .await
            .entry(table.name())
            .or_default()
            .push(row.clone());
        Ok(())
    }

    async fn update(
        &self,
        table: &Table,
        filter: &Filter,
        assignments: &Record,
    ) -> Result<u64, DbError> {
        let mut tables = self.tables.write().await;
        let mut affected = 0;

        for row in tables.entry(table.name()).or_default().iter_mut() {
            if filter.matches(row) {
                for (name, value) in assignments.iter() {
                    row.set(name, value.clone());
                }
                affected += 1;
            }
        }

        Ok(affected)
    }

    async fn delete(&self, table: &Table, filter: &Filter) -> Result<u64, DbError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.name()).or_default();

        let before = rows.len();
        rows.retain(|row| !filter.matches(row));
        Ok((before - rows.len()) as u64)
    }
}

//! Postgres gateway over a sqlx connection pool

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::gateway::{DbError, Filter, Gateway};
use super::sql;
use crate::catalog::{Column, Table};
use crate::models::{Record, Value};
use crate::schema::FieldKind;

/// Gateway backed by a `PgPool`; each call checks a connection out of the
/// pool for the duration of one statement.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
    schema: Option<String>,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, schema: None }
    }

    /// Qualify table names with a database schema.
    pub fn with_schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema.filter(|s| !s.is_empty());
        self
    }

    fn table_ref(&self, table: &Table) -> String {
        sql::table_ref(self.schema.as_deref(), table.name())
    }
}

fn decode(row: &PgRow, index: usize, kind: FieldKind) -> Result<Value, sqlx::Error> {
    let value = match kind {
        FieldKind::Text => row.try_get::<Option<String>, _>(index)?.map(Value::Text),
        FieldKind::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(Value::Timestamp),
        FieldKind::Float => row.try_get::<Option<f64>, _>(index)?.map(Value::Float),
        FieldKind::Integer => row.try_get::<Option<i64>, _>(index)?.map(Value::Integer),
    };
    Ok(value.unwrap_or(Value::Null))
}

fn decode_row(table: &Table, row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::with_capacity(table.columns().len());
    for (index, column) in table.columns().iter().enumerate() {
        record.push(column.name, decode(row, index, column.kind)?);
    }
    Ok(record)
}

#[async_trait]
impl Gateway for PgGateway {
    async fn fetch(&self, table: &Table, filter: &Filter) -> Result<Option<Vec<Record>>, DbError> {
        let mut stmt = sql::select(&self.table_ref(table), table, filter);
        tracing::debug!(sql = stmt.sql(), "fetch");

        let rows = stmt.build().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Ok(None);
        }

        let records = rows
            .iter()
            .map(|row| decode_row(table, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(records))
    }

    async fn count_by(
        &self,
        table: &Table,
        column: &Column,
        filter: &Filter,
    ) -> Result<Vec<(Value, i64)>, DbError> {
        let mut stmt = sql::count_by(&self.table_ref(table), column, filter);
        tracing::debug!(sql = stmt.sql(), "count_by");

        let rows = stmt.build().fetch_all(&self.pool).await?;
        let counts = rows
            .iter()
            .map(|row| Ok((decode(row, 0, column.kind)?, row.try_get::<i64, _>(1)?)))
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(counts)
    }

    async fn insert(&self, table: &Table, row: &Record) -> Result<(), DbError> {
        let mut stmt = sql::insert(&self.table_ref(table), row);
        tracing::debug!(sql = stmt.sql(), "insert");

        stmt.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn update(
        &self,
        table: &Table,
        filter: &Filter,
        assignments: &Record,
    ) -> Result<u64, DbError> {
        let mut stmt = sql::update(&self.table_ref(table), assignments, filter);
        tracing::debug!(sql = stmt.sql(), "update");

        let result = stmt.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, table: &Table, filter: &Filter) -> Result<u64, DbError> {
        let mut stmt = sql::delete(&self.table_ref(table), filter);
        tracing::debug!(sql = stmt.sql(), "delete");

        let result = stmt.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::db::pool::create_pool_with_options;
    use crate::schema::Entity;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p tourdesk-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn location_round_trip_on_temp_table() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        // One connection so the temp table stays visible to every call
        let pool = create_pool_with_options(&url, 1).await.expect("pool creation failed");
        sqlx::query("CREATE TEMP TABLE \"T_地點\" (\"地點\" TEXT PRIMARY KEY)")
            .execute(&pool)
            .await
            .expect("create temp table");

        let catalog = Catalog::default();
        let table = catalog.table(Entity::Location);
        let gateway = PgGateway::new(pool);

        let mut row = Record::new();
        row.push("地點", Value::Text("台南".into()));
        gateway.insert(table, &row).await.unwrap();

        let filter = Filter::all().eq("地點", Value::Text("台南".into()));
        let rows = gateway.fetch(table, &filter).await.unwrap().unwrap();
        assert_eq!(rows, vec![row]);

        assert_eq!(gateway.delete(table, &filter).await.unwrap(), 1);
        assert!(gateway.fetch(table, &filter).await.unwrap().is_none());
    }
}

//! Statement builders for Postgres
//!
//! Identifiers come from the static table declarations and are always
//! double-quoted. Every value is a bind parameter, except null which is
//! written as a literal `NULL`.

use sqlx::{Postgres, QueryBuilder};

use crate::catalog::{Column, Table};
use crate::models::{Record, Value};
use crate::schema::FieldKind;

use super::gateway::Filter;

pub type Statement = QueryBuilder<'static, Postgres>;

/// Double-quote an identifier.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quoted, optionally schema-qualified table reference.
pub fn table_ref(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(table)),
        None => quote_ident(table),
    }
}

/// Cast target used in select lists so rows decode by effective type.
fn cast(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Timestamp => "timestamp",
        FieldKind::Float => "float8",
        FieldKind::Integer => "int8",
    }
}

fn push_column(builder: &mut Statement, column: &Column) {
    let ident = quote_ident(column.name);
    builder.push(format!("{}::{} AS {}", ident, cast(column.kind), ident));
}

fn push_value(builder: &mut Statement, value: &Value) {
    match value {
        Value::Null => builder.push("NULL"),
        Value::Text(s) => builder.push_bind(s.clone()),
        Value::Float(f) => builder.push_bind(*f),
        Value::Integer(i) => builder.push_bind(*i),
        Value::Timestamp(ts) => builder.push_bind(*ts),
    };
}

fn push_where(builder: &mut Statement, filter: &Filter) {
    for (i, (column, value)) in filter.conditions().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(quote_ident(column));
        if value.is_null() {
            builder.push(" IS NULL");
        } else {
            builder.push(" = ");
            push_value(builder, value);
        }
    }
}

/// `SELECT <declared columns> FROM <table> [WHERE ..]`
pub fn select(table_ref: &str, table: &Table, filter: &Filter) -> Statement {
    let mut builder = QueryBuilder::new("SELECT ");
    for (i, column) in table.columns().iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_column(&mut builder, column);
    }
    builder.push(" FROM ").push(table_ref);
    push_where(&mut builder, filter);
    builder
}

/// `SELECT <column>, COUNT(*) .. GROUP BY <column>`
pub fn count_by(table_ref: &str, column: &Column, filter: &Filter) -> Statement {
    let mut builder = QueryBuilder::new("SELECT ");
    push_column(&mut builder, column);
    builder.push(", COUNT(*) AS \"count\" FROM ").push(table_ref);
    push_where(&mut builder, filter);
    builder.push(" GROUP BY ").push(quote_ident(column.name));
    builder
}

/// `INSERT INTO <table> (<row columns>) VALUES (..)`
pub fn insert(table_ref: &str, row: &Record) -> Statement {
    let mut builder = QueryBuilder::new("INSERT INTO ");
    builder.push(table_ref).push(" (");
    for (i, (name, _)) in row.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(quote_ident(name));
    }
    builder.push(") VALUES (");
    for (i, (_, value)) in row.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(")");
    builder
}

/// `UPDATE <table> SET <col> = .., .. WHERE ..`
pub fn update(table_ref: &str, assignments: &Record, filter: &Filter) -> Statement {
    let mut builder = QueryBuilder::new("UPDATE ");
    builder.push(table_ref).push(" SET ");
    for (i, (name, value)) in assignments.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(quote_ident(name)).push(" = ");
        push_value(&mut builder, value);
    }
    push_where(&mut builder, filter);
    builder
}

/// `DELETE FROM <table> WHERE ..`
pub fn delete(table_ref: &str, filter: &Filter) -> Statement {
    let mut builder = QueryBuilder::new("DELETE FROM ");
    builder.push(table_ref);
    push_where(&mut builder, filter);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{parse_timestamp, NaturalKey};
    use crate::schema::{Entity, DEPARTURE_DATE};

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("T_客戶"), "\"T_客戶\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(table_ref(Some("dbo"), "T_地點"), "\"dbo\".\"T_地點\"");
    }

    #[test]
    fn select_casts_declared_columns() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Currency);
        let filter = Filter::all().eq("貨幣名稱", Value::Text("新台幣".into()));

        let stmt = select("\"T_貨幣\"", table, &filter);
        assert_eq!(
            stmt.sql(),
            "SELECT \"貨幣名稱\"::text AS \"貨幣名稱\", \"貨幣代碼\"::text AS \"貨幣代碼\", \
             \"預設匯率\"::float8 AS \"預設匯率\" FROM \"T_貨幣\" WHERE \"貨幣名稱\" = $1"
        );
    }

    #[test]
    fn select_all_has_no_where() {
        let catalog = Catalog::default();
        let stmt = select("\"T_地點\"", catalog.table(Entity::Location), &Filter::all());
        assert_eq!(stmt.sql(), "SELECT \"地點\"::text AS \"地點\" FROM \"T_地點\"");
    }

    #[test]
    fn count_groups_by_column() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Enrollment);
        let column = table.column(DEPARTURE_DATE).unwrap();

        let stmt = count_by("\"T_旅行團客戶\"", column, &Filter::all());
        assert_eq!(
            stmt.sql(),
            "SELECT \"出團日期\"::timestamp AS \"出團日期\", COUNT(*) AS \"count\" \
             FROM \"T_旅行團客戶\" GROUP BY \"出團日期\""
        );
    }

    #[test]
    fn insert_binds_values_and_inlines_null() {
        let mut row = Record::new();
        row.push("貨幣名稱", Value::Text("港幣".into()));
        row.push("貨幣代碼", Value::Null);
        row.push("預設匯率", Value::Float(1.0));
        row.push("add_user_id", Value::Integer(6));

        let stmt = insert("\"T_貨幣\"", &row);
        assert_eq!(
            stmt.sql(),
            "INSERT INTO \"T_貨幣\" (\"貨幣名稱\", \"貨幣代碼\", \"預設匯率\", \"add_user_id\") \
             VALUES ($1, NULL, $2, $3)"
        );
    }

    #[test]
    fn update_filters_by_composite_key() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Enrollment);
        let key = NaturalKey::parse(table, &["0001", "2025-02-20"]).unwrap();

        let mut assignments = Record::new();
        assignments.push("佣金", Value::Null);
        assignments.push("姓名", Value::Text("王小明".into()));

        let stmt = update("\"T_旅行團客戶\"", &assignments, &Filter::from(&key));
        assert_eq!(
            stmt.sql(),
            "UPDATE \"T_旅行團客戶\" SET \"佣金\" = NULL, \"姓名\" = $1 \
             WHERE \"客戶ID\" = $2 AND \"出團日期\" = $3"
        );
    }

    #[test]
    fn delete_never_inlines_values() {
        let filter = Filter::all().eq(
            DEPARTURE_DATE,
            Value::Timestamp(parse_timestamp("2010-05-07").unwrap()),
        );
        let stmt = delete("\"T_旅行團\"", &filter);
        assert_eq!(stmt.sql(), "DELETE FROM \"T_旅行團\" WHERE \"出團日期\" = $1");

        let filter = Filter::all().eq("地點", Value::Text("x'; DROP TABLE \"T_地點\"; --".into()));
        let stmt = delete("\"T_地點\"", &filter);
        assert_eq!(stmt.sql(), "DELETE FROM \"T_地點\" WHERE \"地點\" = $1");
    }
}

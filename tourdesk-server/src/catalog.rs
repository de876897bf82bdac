//! Resolved table layouts
//!
//! A [`Table`] combines a static [`EntitySchema`] with the numeric
//! allowlist: allowlisted columns become numbers, timestamps stay
//! timestamps, everything else is text. Key columns keep their declared
//! type.

use crate::config::NumericColumns;
use crate::schema::{Entity, EntitySchema, FieldKind};

/// A column with its effective type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Effective layout of one table
#[derive(Debug, Clone)]
pub struct Table {
    schema: &'static EntitySchema,
    columns: Vec<Column>,
}

impl Table {
    pub fn resolve(schema: &'static EntitySchema, numeric: &NumericColumns) -> Self {
        let columns = schema
            .fields
            .iter()
            .map(|field| {
                let kind = if schema.is_key(field.name) {
                    field.kind
                } else if numeric.contains(schema.table, field.name) {
                    match field.kind {
                        FieldKind::Integer => FieldKind::Integer,
                        _ => FieldKind::Float,
                    }
                } else {
                    match field.kind {
                        FieldKind::Timestamp => FieldKind::Timestamp,
                        _ => FieldKind::Text,
                    }
                };

                if field.kind.is_numeric() != kind.is_numeric() {
                    tracing::debug!(
                        table = schema.table,
                        column = field.name,
                        declared = field.kind.as_str(),
                        effective = kind.as_str(),
                        "column type overridden by numeric allowlist"
                    );
                }

                Column { name: field.name, kind }
            })
            .collect();

        for column in numeric.columns(schema.table) {
            if schema.field(column).is_none() {
                tracing::warn!(table = schema.table, column, "allowlisted column is not declared");
            }
        }

        Self { schema, columns }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn name(&self) -> &'static str {
        self.schema.table
    }

    pub fn resource(&self) -> &'static str {
        self.schema.resource
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Key columns in key order.
    pub fn key_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.schema
            .key
            .iter()
            .filter_map(move |name| self.column(name))
    }

    pub fn is_key(&self, name: &str) -> bool {
        self.schema.is_key(name)
    }
}

/// All resolved tables, built once at startup
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<Table>,
}

impl Catalog {
    pub fn new(numeric: &NumericColumns) -> Self {
        for table in numeric.tables() {
            if !Entity::ALL.iter().any(|e| e.schema().table == table) {
                tracing::warn!(table, "numeric column file names an unknown table");
            }
        }

        let tables = Entity::ALL
            .iter()
            .map(|entity| Table::resolve(entity.schema(), numeric))
            .collect();

        Self { tables }
    }

    pub fn table(&self, entity: Entity) -> &Table {
        &self.tables[entity.index()]
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&NumericColumns::declared())
    }
}

//! Ordered column/value records

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use super::{ValidationError, Value};
use crate::catalog::Table;

/// A row: column names paired with values, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Validate a JSON body against the table's declared columns.
    ///
    /// Unknown members are ignored, missing members become null. Key
    /// columns must be present, non-null and non-empty.
    pub fn from_json(table: &Table, body: &JsonValue) -> Result<Self, ValidationError> {
        let object = body.as_object().ok_or(ValidationError::NotAnObject)?;

        let mut record = Self::with_capacity(table.columns().len());
        for column in table.columns() {
            let value = match object.get(column.name) {
                Some(json) => Value::from_json(column.name, column.kind, json)?,
                None => Value::Null,
            };

            if table.is_key(column.name) && value.is_blank() {
                return Err(ValidationError::Missing { field: column.name });
            }

            record.push(column.name, value);
        }

        Ok(record)
    }

    pub fn push(&mut self, name: &'static str, value: Value) {
        self.fields.push((name, value));
    }

    /// Replace the value of `name`, appending it if absent.
    pub fn set(&mut self, name: &'static str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keep only the table's columns, in column order; absent ones are null.
    pub fn project(&self, table: &Table) -> Self {
        let fields = table
            .columns()
            .iter()
            .map(|c| (c.name, self.get(c.name).cloned().unwrap_or(Value::Null)))
            .collect();
        Self { fields }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::schema::Entity;
    use serde_json::json;

    #[test]
    fn fills_missing_fields_with_null() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Currency);

        let record = Record::from_json(table, &json!({"貨幣名稱": "新台幣"})).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("貨幣名稱"), Some(&Value::Text("新台幣".into())));
        assert_eq!(record.get("預設匯率"), Some(&Value::Null));
    }

    #[test]
    fn ignores_unknown_and_audit_members() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Customer);

        let record = Record::from_json(
            table,
            &json!({"ID": "-1234", "add_user_id": 99, "update_time": "2020-01-01", "extra": true}),
        )
        .unwrap();
        assert!(record.get("add_user_id").is_none());
        assert!(record.get("extra").is_none());
    }

    #[test]
    fn key_is_required() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Enrollment);

        let err = Record::from_json(table, &json!({"客戶ID": "0001"})).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "出團日期" });

        let err = Record::from_json(table, &json!({"客戶ID": null, "出團日期": "2025-02-20"}))
            .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "客戶ID" });
    }

    #[test]
    fn empty_key_is_missing() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Customer);

        let err = Record::from_json(table, &json!({"ID": "", "姓名": "王小明"})).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "ID" });

        // Non-key text may be empty
        let record = Record::from_json(table, &json!({"ID": "0001", "姓名": ""})).unwrap();
        assert_eq!(record.get("姓名"), Some(&Value::Text(String::new())));
    }

    #[test]
    fn rejects_non_objects() {
        let catalog = Catalog::default();
        let err = Record::from_json(catalog.table(Entity::Location), &json!(["台南"])).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject);
    }

    #[test]
    fn serializes_in_column_order() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Currency);
        let record = Record::from_json(
            table,
            &json!({"預設匯率": 4.2, "貨幣代碼": "HKD", "貨幣名稱": "港幣"}),
        )
        .unwrap();

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"貨幣名稱":"港幣","貨幣代碼":"HKD","預設匯率":4.2}"#);
    }

    #[test]
    fn project_drops_extra_columns() {
        let catalog = Catalog::default();
        let table = catalog.table(Entity::Location);

        let mut row = Record::new();
        row.push("add_time", Value::Null);
        row.push("地點", Value::Text("台南".into()));

        let projected = row.project(table);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get("地點"), Some(&Value::Text("台南".into())));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut record = Record::new();
        record.push("a", Value::Integer(1));
        record.set("a", Value::Integer(2));
        record.set("b", Value::Null);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&Value::Integer(2)));
    }
}

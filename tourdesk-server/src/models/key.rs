//! Natural keys

use std::fmt;

use super::{Record, ValidationError, Value};
use crate::catalog::Table;

/// Values of a table's natural key columns, in key order
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalKey {
    parts: Vec<(&'static str, Value)>,
}

impl NaturalKey {
    /// Parse raw query-string values, given in key order.
    pub fn parse(table: &Table, raw: &[&str]) -> Result<Self, ValidationError> {
        let parts = table
            .key_columns()
            .zip(raw.iter().copied().map(Some).chain(std::iter::repeat(None)))
            .map(|(column, raw)| match raw {
                Some(raw) if !raw.is_empty() => {
                    Value::parse(column.name, column.kind, raw).map(|v| (column.name, v))
                }
                _ => Err(ValidationError::Missing { field: column.name }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { parts })
    }

    /// Read the key out of a validated record.
    pub fn of(table: &Table, record: &Record) -> Result<Self, ValidationError> {
        let parts = table
            .key_columns()
            .map(|column| match record.get(column.name) {
                Some(value) if !value.is_blank() => Ok((column.name, value.clone())),
                _ => Err(ValidationError::Missing { field: column.name }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[(&'static str, Value)] {
        &self.parts
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.parts.iter().find(|(n, _)| *n == column).map(|(_, v)| v)
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts.as_slice() {
            [(_, value)] => write!(f, "{}", value),
            parts => {
                for (i, (name, value)) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                Ok(())
            }
        }
    }
}

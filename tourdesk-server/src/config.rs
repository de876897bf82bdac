//! Numeric column allowlist
//!
//! Loaded once at startup from a JSON file of the form
//! `{ "T_客戶": ["佣金比率A", ...], ... }` and read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::Entity;

/// Path tried when no allowlist file is given explicitly
pub const DEFAULT_NUM_COLS_PATH: &str = "./num_cols.json";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid numeric column file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Per-table set of columns that travel as numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericColumns {
    tables: BTreeMap<String, BTreeSet<String>>,
}

impl NumericColumns {
    /// Parse an allowlist from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load an allowlist file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Load `path` if given, otherwise the default file when present,
    /// otherwise fall back to the declared numeric columns.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            let numeric = Self::load(path)?;
            tracing::info!(path = %path.display(), "numeric column allowlist loaded");
            return Ok(numeric);
        }

        let default = Path::new(DEFAULT_NUM_COLS_PATH);
        if default.exists() {
            let numeric = Self::load(default)?;
            tracing::info!(path = %default.display(), "numeric column allowlist loaded");
            return Ok(numeric);
        }

        tracing::warn!(
            path = DEFAULT_NUM_COLS_PATH,
            "numeric column file not found, using declared numeric columns"
        );
        Ok(Self::declared())
    }

    /// Allowlist matching the declared numeric (non-key) columns.
    pub fn declared() -> Self {
        let tables = Entity::ALL
            .iter()
            .map(|entity| {
                let schema = entity.schema();
                let columns = schema
                    .fields
                    .iter()
                    .filter(|f| f.kind.is_numeric() && !schema.is_key(f.name))
                    .map(|f| f.name.to_owned())
                    .collect();
                (schema.table.to_owned(), columns)
            })
            .collect();

        Self { tables }
    }

    /// Whether `column` of `table` is allowlisted.
    pub fn contains(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    /// Allowlisted columns of one table.
    pub fn columns(&self, table: &str) -> impl Iterator<Item = &str> {
        self.tables
            .get(table)
            .into_iter()
            .flat_map(|columns| columns.iter().map(String::as_str))
    }

    /// Table names present in the allowlist.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_table_map() {
        let numeric = NumericColumns::from_json(r#"{"T_貨幣": ["預設匯率"]}"#).unwrap();
        assert!(numeric.contains("T_貨幣", "預設匯率"));
        assert!(!numeric.contains("T_貨幣", "貨幣代碼"));
        assert!(!numeric.contains("T_客戶", "預設匯率"));
    }

    #[test]
    fn declared_skips_text_and_keys() {
        let numeric = NumericColumns::declared();
        assert!(numeric.contains("T_客戶", "信用額度"));
        assert!(numeric.contains("T_旅行團", "損_港務費_人數"));
        assert!(!numeric.contains("T_客戶", "姓名"));
        assert!(!numeric.contains("T_旅行團", "出團日期"));
        assert_eq!(numeric.columns("T_地點").count(), 0);
    }

    #[test]
    fn declared_round_trips_through_json() {
        let numeric = NumericColumns::declared();
        let json = numeric.to_json_pretty().unwrap();
        assert_eq!(NumericColumns::from_json(&json).unwrap(), numeric);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"T_旅行團客戶": ["佣金"]}}"#).unwrap();

        let numeric = NumericColumns::load(file.path()).unwrap();
        assert!(numeric.contains("T_旅行團客戶", "佣金"));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = NumericColumns::load_or_default(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["not", "a", "map"]"#).unwrap();

        let err = NumericColumns::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

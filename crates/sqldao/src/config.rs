//! DAO configuration: raw options and the validated, immutable [`Config`].
//!
//! Options come either from the typed builder on [`DaoOptions`] or from a
//! dynamic JSON bag via [`DaoOptions::from_json`]. Either way they are checked
//! once by [`Config::validate`] against the [`ColumnSchema`].
//!
//! # Example
//! ```
//! use sqldao::{ColumnSchema, ColumnType, Config, DaoOptions, DeleteMethod};
//!
//! let schema = ColumnSchema::new()
//!     .column("id", ColumnType::Integer)
//!     .column("active", ColumnType::Text);
//! let options = DaoOptions::new("id")
//!     .delete_method(DeleteMethod::Deactivate)
//!     .deactivate_column("active");
//! let config = Config::validate(&schema, options)?;
//! assert!(config.key_is_autogenerated());
//! # Ok::<(), sqldao::DaoError>(())
//! ```

use crate::error::{DaoError, DaoResult};
use crate::schema::{ColumnSchema, ColumnType};
use crate::value::Value;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Sentinel stored in the deactivate column for live rows.
pub const ACTIVE: i64 = 1;
/// Sentinel stored in the deactivate column for deactivated rows.
pub const INACTIVE: i64 = 0;

/// How `delete` removes a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMethod {
    /// `DELETE FROM ...`
    #[default]
    Delete,
    /// Flip the deactivate column to the inactive sentinel.
    Deactivate,
}

impl FromStr for DeleteMethod {
    type Err = DaoError;

    fn from_str(s: &str) -> DaoResult<Self> {
        match s {
            "delete" => Ok(DeleteMethod::Delete),
            "deactivate" => Ok(DeleteMethod::Deactivate),
            other => Err(DaoError::configuration(format!(
                "deleteMethod must be 'delete' or 'deactivate', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DeleteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteMethod::Delete => f.write_str("delete"),
            DeleteMethod::Deactivate => f.write_str("deactivate"),
        }
    }
}

/// Unvalidated configuration input.
///
/// Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaoOptions {
    pub key: Option<String>,
    pub key_is_autogenerated: Option<bool>,
    pub delete_method: Option<DeleteMethod>,
    pub deactivate_column: Option<String>,
}

impl DaoOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn key_is_autogenerated(mut self, autogenerated: bool) -> Self {
        self.key_is_autogenerated = Some(autogenerated);
        self
    }

    pub fn delete_method(mut self, method: DeleteMethod) -> Self {
        self.delete_method = Some(method);
        self
    }

    pub fn deactivate_column(mut self, column: impl Into<String>) -> Self {
        self.deactivate_column = Some(column.into());
        self
    }

    /// Read options from a dynamic configuration bag.
    ///
    /// Unknown keys are skipped. Wrongly typed known keys are fatal.
    pub fn from_json(bag: &serde_json::Value) -> DaoResult<Self> {
        let map = bag
            .as_object()
            .ok_or_else(|| DaoError::configuration("configuration must be an object"))?;

        let mut options = DaoOptions::default();
        for (name, value) in map {
            match name.as_str() {
                "key" => {
                    let key = value.as_str().ok_or_else(|| {
                        DaoError::configuration(format!("key must be a string, got {value}"))
                    })?;
                    options.key = Some(key.to_string());
                }
                "keyIsAutogenerated" => {
                    let flag = value.as_bool().ok_or_else(|| {
                        DaoError::configuration(format!(
                            "keyIsAutogenerated must be a boolean, got {value}"
                        ))
                    })?;
                    options.key_is_autogenerated = Some(flag);
                }
                "deleteMethod" => {
                    let method = value.as_str().ok_or_else(|| {
                        DaoError::configuration(format!(
                            "deleteMethod must be a string, got {value}"
                        ))
                    })?;
                    options.delete_method = Some(method.parse()?);
                }
                "deactivateColumn" => {
                    let column = value.as_str().ok_or_else(|| {
                        DaoError::configuration(format!(
                            "deactivateColumn must be a string, got {value}"
                        ))
                    })?;
                    options.deactivate_column = Some(column.to_string());
                }
                _ => {}
            }
        }
        Ok(options)
    }
}

/// Resolved delete behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStrategy {
    Delete,
    Deactivate { column: String, column_type: ColumnType },
}

/// Validated, immutable DAO configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    key: String,
    key_type: ColumnType,
    key_is_autogenerated: bool,
    delete: DeleteStrategy,
}

impl Config {
    /// Validate `options` against `schema`.
    ///
    /// The deactivate column is checked here rather than on first use.
    pub fn validate(schema: &ColumnSchema, options: DaoOptions) -> DaoResult<Self> {
        let key = match options.key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(DaoError::configuration("key is required")),
        };
        let key_type = schema.get(&key).ok_or_else(|| {
            DaoError::configuration(format!("key '{key}' is not a column of the schema"))
        })?;

        let key_is_autogenerated = options.key_is_autogenerated.unwrap_or(true);

        if let Some(column) = &options.deactivate_column {
            if !schema.contains(column) {
                return Err(DaoError::configuration(format!(
                    "deactivateColumn '{column}' is not a column of the schema"
                )));
            }
        }

        let delete = match options.delete_method.unwrap_or_default() {
            DeleteMethod::Delete => DeleteStrategy::Delete,
            DeleteMethod::Deactivate => {
                let column = options.deactivate_column.ok_or_else(|| {
                    DaoError::configuration("deactivateColumn is required when deleteMethod is 'deactivate'")
                })?;
                let column_type = schema.get(&column).ok_or_else(|| {
                    DaoError::configuration(format!(
                        "deactivateColumn '{column}' is not a column of the schema"
                    ))
                })?;
                DeleteStrategy::Deactivate {
                    column,
                    column_type,
                }
            }
        };

        Ok(Self {
            key,
            key_type,
            key_is_autogenerated,
            delete,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_type(&self) -> ColumnType {
        self.key_type
    }

    pub fn key_is_autogenerated(&self) -> bool {
        self.key_is_autogenerated
    }

    pub fn delete_strategy(&self) -> &DeleteStrategy {
        &self.delete
    }

    pub fn delete_method(&self) -> DeleteMethod {
        match self.delete {
            DeleteStrategy::Delete => DeleteMethod::Delete,
            DeleteStrategy::Deactivate { .. } => DeleteMethod::Deactivate,
        }
    }

    /// The deactivate column and its type, when soft delete is configured.
    pub fn deactivate_column(&self) -> Option<(&str, ColumnType)> {
        match &self.delete {
            DeleteStrategy::Delete => None,
            DeleteStrategy::Deactivate {
                column,
                column_type,
            } => Some((column, *column_type)),
        }
    }
}

/// SQL literal for a deactivate sentinel: quoted for text columns, bare otherwise.
pub(crate) fn sentinel_literal(column_type: ColumnType, sentinel: i64) -> String {
    if column_type.is_text() {
        format!("'{sentinel}'")
    } else {
        sentinel.to_string()
    }
}

/// Sentinel as a bindable value of the column's type.
pub(crate) fn sentinel_value(column_type: ColumnType, sentinel: i64) -> Value {
    column_type.coerce(&Value::Integer(sentinel))
}

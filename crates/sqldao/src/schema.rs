//! Column schema: property name -> declared scalar type.

use crate::error::{DaoError, DaoResult};
use crate::value::Value;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Declared scalar type of a column.
///
/// The type drives both parameter binding (values are coerced before they are
/// handed to the statement) and literal rendering of the deactivate sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Bool,
    Blob,
}

impl ColumnType {
    pub fn is_text(self) -> bool {
        matches!(self, ColumnType::Text)
    }

    /// Convert `value` into the representation this column binds with.
    ///
    /// `Null` always stays `Null`. Values that cannot be converted are
    /// returned unchanged so the database reports the mismatch.
    pub fn coerce(self, value: &Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,

            (ColumnType::Integer, Value::Bool(b)) => Value::Integer(i64::from(*b)),
            // `i64::MAX as f64` is 2^63, which does not fit
            (ColumnType::Integer, Value::Real(r))
                if r.fract() == 0.0 && *r >= i64::MIN as f64 && *r < i64::MAX as f64 =>
            {
                Value::Integer(*r as i64)
            }
            (ColumnType::Integer, Value::Text(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => value.clone(),
            },

            (ColumnType::Real, Value::Integer(i)) => Value::Real(*i as f64),
            (ColumnType::Real, Value::Text(s)) => match s.trim().parse::<f64>() {
                Ok(r) => Value::Real(r),
                Err(_) => value.clone(),
            },

            (ColumnType::Text, Value::Integer(i)) => Value::Text(i.to_string()),
            (ColumnType::Text, Value::Real(r)) => Value::Text(r.to_string()),
            (ColumnType::Text, Value::Bool(b)) => Value::Text(if *b { "1" } else { "0" }.into()),

            (ColumnType::Bool, Value::Integer(i)) => Value::Bool(*i != 0),
            (ColumnType::Bool, Value::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "t" | "yes" => Value::Bool(true),
                "0" | "false" | "f" | "no" | "" => Value::Bool(false),
                _ => value.clone(),
            },

            (ColumnType::Blob, Value::Text(s)) => Value::Blob(s.as_bytes().to_vec()),

            _ => value.clone(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Real => "real",
            ColumnType::Text => "text",
            ColumnType::Bool => "bool",
            ColumnType::Blob => "blob",
        };
        f.write_str(name)
    }
}

impl FromStr for ColumnType {
    type Err = DaoError;

    fn from_str(s: &str) -> DaoResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "bigint" | "smallint" => Ok(ColumnType::Integer),
            "real" | "float" | "double" | "numeric" | "decimal" => Ok(ColumnType::Real),
            "str" | "string" | "text" | "varchar" | "char" => Ok(ColumnType::Text),
            "bool" | "boolean" => Ok(ColumnType::Bool),
            "blob" | "bytes" | "binary" | "lob" => Ok(ColumnType::Blob),
            other => Err(DaoError::configuration(format!(
                "unknown column type '{other}'"
            ))),
        }
    }
}

/// Mapping from property name to declared [`ColumnType`], in declaration order.
///
/// Immutable once handed to a [`Dao`](crate::Dao).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSchema {
    columns: Vec<(String, ColumnType)>,
}

impl ColumnSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or retype) a column.
    pub fn column(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = ty,
            None => self.columns.push((name, ty)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns.iter().map(|(n, ty)| (n.as_str(), *ty))
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnType)> for ColumnSchema {
    fn from_iter<I: IntoIterator<Item = (S, ColumnType)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ColumnSchema::new(), |schema, (name, ty)| schema.column(name, ty))
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ColumnSchema {
    /// Deserializes from an object such as `{"id": "int", "name": "string"}`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::deserialize(deserializer)?;
        let mut schema = ColumnSchema::new();
        for (name, ty) in map {
            let ty = match ty {
                serde_json::Value::String(s) => s.parse().map_err(serde::de::Error::custom)?,
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "column '{name}': expected a type name, got {other}"
                    )));
                }
            };
            schema = schema.column(name, ty);
        }
        Ok(schema)
    }
}

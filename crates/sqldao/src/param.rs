//! Typed positional parameters and the statements that carry them.

use crate::schema::ColumnType;
use crate::value::Value;

/// A value bound to one `?` placeholder, with the declared type of its column.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub value: Value,
    pub ty: ColumnType,
}

impl Param {
    pub fn new(value: impl Into<Value>, ty: ColumnType) -> Self {
        Self {
            value: value.into(),
            ty,
        }
    }
}

/// Parameters in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based position.
    pub fn push(&mut self, value: impl Into<Value>, ty: ColumnType) -> usize {
        self.params.push(Param::new(value, ty));
        self.params.len()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    pub fn values(&self) -> Vec<&Value> {
        self.params.iter().map(|p| &p.value).collect()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// SQL text plus the parameters for its placeholders, in textual order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: ParamList,
}

impl BoundQuery {
    pub fn new(sql: impl Into<String>, params: ParamList) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

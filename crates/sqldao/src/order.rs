//! Order specifications and their compilation into ORDER BY.

use crate::error::{DaoError, DaoResult};
use crate::ident::Dialect;
use crate::schema::ColumnSchema;
use serde::Deserialize;
use std::fmt;

/// Sort direction. Parsed case-insensitively, defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if s.trim().eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `{property, direction?}` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrderBy {
    pub property: Option<String>,
    pub direction: Option<String>,
}

impl OrderBy {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            direction: None,
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property).direction(Direction::Asc)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property).direction(Direction::Desc)
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction.as_sql().to_string());
        self
    }
}

/// Compile order specifications into `ORDER BY "a" ASC, "b" DESC`.
///
/// `None` yields an empty clause, as does an empty list.
pub fn compile_order_by(
    order: Option<&[OrderBy]>,
    schema: &ColumnSchema,
    dialect: Dialect,
) -> DaoResult<String> {
    let Some(order) = order else {
        return Ok(String::new());
    };

    let mut terms = Vec::with_capacity(order.len());
    for (position, entry) in order.iter().enumerate() {
        let property = entry
            .property
            .as_deref()
            .ok_or_else(|| DaoError::order_by(position, "missing property"))?;
        if !schema.contains(property) {
            return Err(DaoError::order_by(
                position,
                format!("unknown property '{property}'"),
            ));
        }
        let direction = match entry.direction.as_deref() {
            None => Direction::Asc,
            Some(raw) => Direction::parse(raw).ok_or_else(|| {
                DaoError::order_by(position, format!("illegal direction '{raw}'"))
            })?,
        };
        terms.push(format!("{} {}", dialect.escape(property), direction));
    }

    if terms.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("ORDER BY {}", terms.join(", ")))
}

//! SQL identifier quoting.
//!
//! Identifiers are split on `.` and each segment is wrapped in the dialect's
//! quote character, except a bare `*` segment:
//!
//! - `users` -> `"users"`
//! - `users.name` -> `"users"."name"`
//! - `users.*` -> `"users".*`
//!
//! Embedded quote characters are **not** escaped. Only schema-defined names
//! should reach this module; values are always bound as parameters.

use std::fmt;

/// Identifier quoting style of the target engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Double quotes (`"name"`): SQLite, PostgreSQL and other ANSI engines.
    #[default]
    Ansi,
    /// Backticks (`` `name` ``): MySQL and MariaDB.
    MySql,
}

impl Dialect {
    /// Resolve the dialect from a driver name such as `sqlite`, `pgsql` or `mysql`.
    pub fn from_driver_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Dialect::MySql,
            _ => Dialect::Ansi,
        }
    }

    pub fn quote_char(self) -> char {
        match self {
            Dialect::Ansi => '"',
            Dialect::MySql => '`',
        }
    }

    /// Whether the engine accepts `INSERT INTO t DEFAULT VALUES`.
    pub fn supports_default_values(self) -> bool {
        matches!(self, Dialect::Ansi)
    }

    /// Quote an identifier, preserving `table.column` and `table.*` forms.
    pub fn escape(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 4);
        self.write_escaped(&mut out, name);
        out
    }

    pub(crate) fn write_escaped(self, out: &mut String, name: &str) {
        let quote = self.quote_char();
        for (i, segment) in name.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            if segment == "*" {
                out.push('*');
            } else {
                out.push(quote);
                out.push_str(segment);
                out.push(quote);
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Ansi => f.write_str("ansi"),
            Dialect::MySql => f.write_str("mysql"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_simple() {
        assert_eq!(Dialect::Ansi.escape("a"), r#""a""#);
    }

    #[test]
    fn escape_dotted() {
        assert_eq!(Dialect::Ansi.escape("a.b"), r#""a"."b""#);
    }

    #[test]
    fn escape_star_stays_bare() {
        assert_eq!(Dialect::Ansi.escape("a.*"), r#""a".*"#);
        assert_eq!(Dialect::Ansi.escape("*"), "*");
    }

    #[test]
    fn escape_mysql_backticks() {
        assert_eq!(Dialect::MySql.escape("users.id"), "`users`.`id`");
        assert_eq!(Dialect::MySql.escape("users.*"), "`users`.*");
    }

    #[test]
    fn dialect_from_driver_name() {
        assert_eq!(Dialect::from_driver_name("mysql"), Dialect::MySql);
        assert_eq!(Dialect::from_driver_name("MariaDB"), Dialect::MySql);
        assert_eq!(Dialect::from_driver_name("sqlite"), Dialect::Ansi);
        assert_eq!(Dialect::from_driver_name("pgsql"), Dialect::Ansi);
    }

    #[test]
    fn default_values_support() {
        assert!(Dialect::Ansi.supports_default_values());
        assert!(!Dialect::MySql.supports_default_values());
    }
}

//! Unified database dialect enum
//!
//! A single source of truth for dialect identification. Each dialect carries
//! its identifier-quoting style and parameter-prefix convention; CAST type
//! names live in [`crate::sql_type`].

/// SQL dialect for database-specific rendering
///
/// Swapping the dialect never changes compiled predicates, only the text the
/// statement builder produces from them.
///
/// # Examples
///
/// ```
/// use joinery_types::Dialect;
///
/// let dialect = Dialect::Postgres;
/// assert_eq!(dialect.quote_ident("Age"), "\"Age\"");
///
/// let oracle = Dialect::Oracle;
/// assert_eq!(oracle.param_prefix(), ':');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// Microsoft SQL Server - `[ident]`, `@name` parameters
    #[cfg_attr(feature = "serde", serde(alias = "mssql"))]
    SqlServer,

    /// MySQL / MariaDB - `` `ident` ``, `@name` parameters
    #[cfg_attr(feature = "serde", serde(alias = "mariadb"))]
    MySql,

    /// PostgreSQL - `"ident"`, `@name` parameters
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "postgresql", alias = "pg"))]
    Postgres,

    /// SQLite - `"ident"`, `@name` parameters
    #[cfg_attr(feature = "serde", serde(alias = "sqlite"))]
    SqlLite,

    /// Oracle - `"ident"`, `:name` parameters
    Oracle,
}

/// How a dialect wraps identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentQuoting {
    /// `"name"`
    DoubleQuote,
    /// `` `name` ``
    Backtick,
    /// `[name]`
    Bracket,
}

impl IdentQuoting {
    const fn delimiters(self) -> (char, char) {
        match self {
            IdentQuoting::DoubleQuote => ('"', '"'),
            IdentQuoting::Backtick => ('`', '`'),
            IdentQuoting::Bracket => ('[', ']'),
        }
    }
}

impl Dialect {
    /// Every supported dialect, in declaration order.
    pub const ALL: [Dialect; 5] = [
        Dialect::SqlServer,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::SqlLite,
        Dialect::Oracle,
    ];

    /// Identifier quoting style for this dialect.
    #[inline]
    #[must_use]
    pub const fn quoting(&self) -> IdentQuoting {
        match self {
            Dialect::SqlServer => IdentQuoting::Bracket,
            Dialect::MySql => IdentQuoting::Backtick,
            Dialect::Postgres | Dialect::SqlLite | Dialect::Oracle => IdentQuoting::DoubleQuote,
        }
    }

    /// Prefix character for named parameters.
    #[inline]
    #[must_use]
    pub const fn param_prefix(&self) -> char {
        match self {
            Dialect::Oracle => ':',
            _ => '@',
        }
    }

    /// Writes `name` quoted for this dialect, doubling any embedded closing delimiter.
    pub fn write_quoted(&self, name: &str, buf: &mut String) {
        let (open, close) = self.quoting().delimiters();
        buf.push(open);
        for ch in name.chars() {
            if ch == close {
                buf.push(close);
            }
            buf.push(ch);
        }
        buf.push(close);
    }

    /// Returns `name` quoted for this dialect.
    #[must_use]
    pub fn quote_ident(&self, name: &str) -> String {
        let mut buf = String::with_capacity(name.len() + 2);
        self.write_quoted(name, &mut buf);
        buf
    }

    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Supports various common aliases:
    /// - SQL Server: `"sqlserver"`, `"mssql"`
    /// - MySQL: `"mysql"`, `"mariadb"`
    /// - PostgreSQL: `"postgres"`, `"postgresql"`, `"pg"`
    /// - SQLite: `"sqllite"`, `"sqlite"`
    /// - Oracle: `"oracle"`
    ///
    /// # Examples
    ///
    /// ```
    /// use joinery_types::Dialect;
    ///
    /// assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SqlLite));
    /// assert_eq!(Dialect::parse("pg"), Some(Dialect::Postgres));
    /// assert_eq!(Dialect::parse("unknown"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        const ALIASES: &[(&str, Dialect)] = &[
            ("sqlserver", Dialect::SqlServer),
            ("mssql", Dialect::SqlServer),
            ("mysql", Dialect::MySql),
            ("mariadb", Dialect::MySql),
            ("postgres", Dialect::Postgres),
            ("postgresql", Dialect::Postgres),
            ("pg", Dialect::Postgres),
            ("sqllite", Dialect::SqlLite),
            ("sqlite", Dialect::SqlLite),
            ("oracle", Dialect::Oracle),
        ];

        ALIASES
            .iter()
            .find(|(alias, _)| s.eq_ignore_ascii_case(alias))
            .map(|(_, dialect)| *dialect)
    }

    /// Get the dialect name as a lowercase string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::SqlServer => "sqlserver",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::SqlLite => "sqllite",
            Dialect::Oracle => "oracle",
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or_else(|| DialectParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown dialect string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}`")]
pub struct DialectParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parse() {
        assert_eq!(Dialect::parse("sqlserver"), Some(Dialect::SqlServer));
        assert_eq!(Dialect::parse("MSSQL"), Some(Dialect::SqlServer));
        assert_eq!(Dialect::parse("mysql"), Some(Dialect::MySql));
        assert_eq!(Dialect::parse("postgresql"), Some(Dialect::Postgres));
        assert_eq!(Dialect::parse("PG"), Some(Dialect::Postgres));
        assert_eq!(Dialect::parse("SqlLite"), Some(Dialect::SqlLite));
        assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SqlLite));
        assert_eq!(Dialect::parse("oracle"), Some(Dialect::Oracle));

        assert_eq!(Dialect::parse("unknown"), None);
        assert_eq!(Dialect::parse(""), None);
    }

    #[test]
    fn test_dialect_quoting() {
        assert_eq!(Dialect::SqlServer.quote_ident("Order"), "[Order]");
        assert_eq!(Dialect::MySql.quote_ident("Order"), "`Order`");
        assert_eq!(Dialect::Postgres.quote_ident("Order"), "\"Order\"");
        assert_eq!(Dialect::SqlLite.quote_ident("Order"), "\"Order\"");
        assert_eq!(Dialect::Oracle.quote_ident("Order"), "\"Order\"");
    }

    #[test]
    fn test_embedded_delimiters_are_doubled() {
        assert_eq!(Dialect::Postgres.quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(Dialect::SqlServer.quote_ident("a]b"), "[a]]b]");
        assert_eq!(Dialect::MySql.quote_ident("a`b"), "`a``b`");
    }

    #[test]
    fn test_param_prefix() {
        for dialect in Dialect::ALL {
            let expected = if dialect == Dialect::Oracle { ':' } else { '@' };
            assert_eq!(dialect.param_prefix(), expected);
        }
    }

    #[test]
    fn test_dialect_display_round_trips() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(dialect));
        }
    }
}

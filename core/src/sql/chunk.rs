use std::borrow::Cow;

use compact_str::CompactString;
use joinery_types::Dialect;

use super::{KeywordCase, Token};
use crate::alias::AliasCode;
use crate::params::DialectExt;

/// A SQL chunk represents a part of an SQL statement.
///
/// Quoting, keyword case and placeholder syntax are decided when the chunk is
/// written, so one chunk list renders for any dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlChunk<'a> {
    /// SQL keywords and operators: SELECT, FROM, WHERE, =, AND, etc.
    Token(Token),

    /// Case-following word that is not a [`Token`], e.g. `YEAR` in `EXTRACT(YEAR FROM x)`
    Keyword(&'static str),

    /// Function name; hugs the following `(`
    Func(&'static str),

    /// Quoted identifier: table, column or output names
    Ident(Cow<'a, str>),

    /// Column reference, alias-qualified when an alias is present: `a."Name"`
    Column {
        alias: Option<AliasCode>,
        name: Cow<'a, str>,
    },

    /// Raw SQL text (unquoted), written as-is
    Raw(Cow<'a, str>),

    /// Named parameter placeholder: `@name` or `:name`
    Param(CompactString),
}

impl<'a> SqlChunk<'a> {
    #[inline]
    pub fn ident(name: impl Into<Cow<'a, str>>) -> Self {
        Self::Ident(name.into())
    }

    #[inline]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self::Raw(text.into())
    }

    #[inline]
    pub fn column(alias: Option<AliasCode>, name: impl Into<Cow<'a, str>>) -> Self {
        Self::Column {
            alias,
            name: name.into(),
        }
    }

    #[inline]
    pub fn number(value: impl Into<i64>) -> Self {
        Self::Raw(Cow::Owned(value.into().to_string()))
    }

    /// Write chunk content to buffer
    pub(crate) fn write(&self, buf: &mut String, dialect: Dialect, case: KeywordCase) {
        match self {
            SqlChunk::Token(token) => buf.push_str(token.spelled(case)),
            SqlChunk::Keyword(word) | SqlChunk::Func(word) => match case {
                KeywordCase::Upper => buf.push_str(word),
                KeywordCase::Lower => buf.extend(word.chars().map(|c| c.to_ascii_lowercase())),
            },
            SqlChunk::Ident(name) => dialect.write_quoted(name, buf),
            SqlChunk::Column { alias, name } => {
                if let Some(alias) = alias {
                    use core::fmt::Write;
                    let _ = write!(buf, "{alias}.");
                }
                dialect.write_quoted(name, buf);
            }
            SqlChunk::Raw(text) => buf.push_str(text),
            SqlChunk::Param(name) => dialect.write_placeholder(name, buf),
        }
    }
}

impl From<Token> for SqlChunk<'_> {
    fn from(value: Token) -> Self {
        SqlChunk::Token(value)
    }
}

/// Canonical spacing logic for chunk rendering: one space between chunks
/// except around `( ) , .` and between a function name and its `(`.
pub(crate) fn chunk_needs_space(current: &SqlChunk<'_>, next: &SqlChunk<'_>) -> bool {
    match (current, next) {
        // No space before closing/separator punctuation
        (_, SqlChunk::Token(Token::RPAREN | Token::COMMA | Token::DOT)) => false,
        // No space after opening punctuation
        (SqlChunk::Token(Token::LPAREN | Token::DOT), _) => false,
        // FUNC(
        (SqlChunk::Func(_), SqlChunk::Token(Token::LPAREN)) => false,
        _ => true,
    }
}

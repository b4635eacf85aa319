mod chunk;
mod predicate;
mod tokens;

pub use chunk::*;
pub use predicate::render_predicate;
pub use tokens::*;

use joinery_types::Dialect;
use smallvec::SmallVec;

/// A statement or fragment as a flat list of chunks.
///
/// Nothing is dialect-specific until [`Sql::render`]: quoting, placeholder
/// prefixes and keyword case are all applied while writing. Most fragments
/// fit the eight inline slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql<'a> {
    pub chunks: SmallVec<[SqlChunk<'a>; 8]>,
}

impl<'a> Sql<'a> {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SqlChunk::Token(t)],
        }
    }

    /// `NAME(args)`; the name follows the keyword case.
    pub fn func(name: &'static str, args: Sql<'a>) -> Self {
        Sql::from(SqlChunk::Func(name))
            .push(Token::LPAREN)
            .append(args)
            .push(Token::RPAREN)
    }

    #[inline]
    pub fn append(mut self, other: impl Into<Sql<'a>>) -> Self {
        self.append_mut(other);
        self
    }

    #[inline]
    pub fn append_mut(&mut self, other: impl Into<Sql<'a>>) {
        let other = other.into();
        if self.chunks.is_empty() {
            self.chunks = other.chunks;
        } else {
            self.chunks.extend(other.chunks);
        }
    }

    #[inline]
    pub fn push(mut self, chunk: impl Into<SqlChunk<'a>>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    #[inline]
    pub fn push_mut(&mut self, chunk: impl Into<SqlChunk<'a>>) {
        self.chunks.push(chunk.into());
    }

    /// `a <sep> b <sep> c`
    pub fn join<I>(sqls: I, separator: Token) -> Sql<'a>
    where
        I: IntoIterator<Item = Sql<'a>>,
    {
        let mut result = Sql::empty();
        for (i, sql) in sqls.into_iter().enumerate() {
            if i > 0 {
                result.chunks.push(SqlChunk::Token(separator));
            }
            result.chunks.extend(sql.chunks);
        }
        result
    }

    #[inline]
    pub fn parens(self) -> Self {
        Sql::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Renders the fragment for `dialect` with the given keyword case.
    pub fn render(&self, dialect: Dialect, case: KeywordCase) -> String {
        crate::joinery_profile_scope!("sql_render", "render");
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        self.write_to(&mut buf, dialect, case);
        buf
    }

    pub fn write_to(&self, buf: &mut String, dialect: Dialect, case: KeywordCase) {
        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.write(buf, dialect, case);
            if let Some(next) = self.chunks.get(i + 1)
                && chunk_needs_space(chunk, next)
            {
                buf.push(' ');
            }
        }
    }
}

impl<'a> From<SqlChunk<'a>> for Sql<'a> {
    fn from(value: SqlChunk<'a>) -> Self {
        Self {
            chunks: smallvec::smallvec![value],
        }
    }
}

impl From<Token> for Sql<'_> {
    fn from(value: Token) -> Self {
        Sql::token(value)
    }
}

impl<'a, T: Into<SqlChunk<'a>>> FromIterator<T> for Sql<'a> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_rules() {
        let sql = Sql::from_iter([Token::SELECT])
            .append(Sql::func("COUNT", Sql::token(Token::STAR)))
            .push(Token::FROM)
            .push(SqlChunk::ident("Order"))
            .push(Token::WHERE)
            .push(SqlChunk::column(None, "Id"))
            .push(Token::IN)
            .append(
                Sql::join(
                    [
                        Sql::from(SqlChunk::Param("Id0".into())),
                        Sql::from(SqlChunk::Param("Id1".into())),
                    ],
                    Token::COMMA,
                )
                .parens(),
            );
        assert_eq!(
            sql.render(Dialect::Postgres, KeywordCase::Upper),
            r#"SELECT COUNT(*) FROM "Order" WHERE "Id" IN (@Id0, @Id1)"#
        );
        assert_eq!(
            sql.render(Dialect::SqlServer, KeywordCase::Lower),
            "select count(*) from [Order] where [Id] in (@Id0, @Id1)"
        );
    }
}

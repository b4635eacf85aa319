/// Keyword spelling used when rendering tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordCase {
    /// `SELECT ... FROM ... WHERE`
    #[default]
    Upper,
    /// `select ... from ... where`
    Lower,
}

macro_rules! tokens {
    (
        keywords { $($kw:ident => $upper:literal / $lower:literal,)* }
        punct { $($p:ident => $text:literal,)* }
    ) => {
        /// SQL keywords and punctuation.
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Token {
            $($kw,)*
            $($p,)*
        }

        impl Token {
            /// Upper-case spelling.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Token::$kw => $upper,)*
                    $(Token::$p => $text,)*
                }
            }

            pub const fn as_lower(self) -> &'static str {
                match self {
                    $(Token::$kw => $lower,)*
                    $(Token::$p => $text,)*
                }
            }

            pub const fn is_keyword(self) -> bool {
                match self {
                    $(Token::$kw => true,)*
                    $(Token::$p => false,)*
                }
            }
        }
    };
}

tokens! {
    keywords {
        SELECT => "SELECT" / "select",
        FROM => "FROM" / "from",
        WHERE => "WHERE" / "where",
        AND => "AND" / "and",
        OR => "OR" / "or",
        NOT => "NOT" / "not",
        IN => "IN" / "in",
        IS => "IS" / "is",
        NULL => "NULL" / "null",
        LIKE => "LIKE" / "like",
        BETWEEN => "BETWEEN" / "between",
        REGEXP => "REGEXP" / "regexp",
        AS => "AS" / "as",
        ON => "ON" / "on",
        JOIN => "JOIN" / "join",
        INNER => "INNER" / "inner",
        LEFT => "LEFT" / "left",
        RIGHT => "RIGHT" / "right",
        FULL => "FULL" / "full",
        OUTER => "OUTER" / "outer",
        ORDER => "ORDER" / "order",
        BY => "BY" / "by",
        ASC => "ASC" / "asc",
        DESC => "DESC" / "desc",
        LIMIT => "LIMIT" / "limit",
        OFFSET => "OFFSET" / "offset",
        ROWS => "ROWS" / "rows",
        FETCH => "FETCH" / "fetch",
        NEXT => "NEXT" / "next",
        ONLY => "ONLY" / "only",
        TOP => "TOP" / "top",
        INSERT => "INSERT" / "insert",
        INTO => "INTO" / "into",
        VALUES => "VALUES" / "values",
        UPDATE => "UPDATE" / "update",
        SET => "SET" / "set",
        DELETE => "DELETE" / "delete",
        CAST => "CAST" / "cast",
        EXEC => "EXEC" / "exec",
        CALL => "CALL" / "call",
        TABLE => "TABLE" / "table",
    }
    punct {
        LPAREN => "(",
        RPAREN => ")",
        COMMA => ",",
        DOT => ".",
        STAR => "*",
        EQ => "=",
        NE => "<>",
        LT => "<",
        GT => ">",
        LE => "<=",
        GE => ">=",
        TILDE => "~",
        NOT_TILDE => "!~",
        CONCAT => "||",
        PLUS => "+",
    }
}

impl Token {
    /// Renders this token in the requested case.
    #[inline]
    pub const fn spelled(self, case: KeywordCase) -> &'static str {
        match case {
            KeywordCase::Upper => self.as_str(),
            KeywordCase::Lower => self.as_lower(),
        }
    }

    /// Binary operators get a space on both sides.
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Token::EQ
                | Token::NE
                | Token::LT
                | Token::GT
                | Token::LE
                | Token::GE
                | Token::TILDE
                | Token::NOT_TILDE
                | Token::CONCAT
                | Token::PLUS
        )
    }
}

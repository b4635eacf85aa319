//! Rendering of compiled predicates into SQL chunks.
//!
//! Keyword case and identifier quoting are applied later by [`Sql::render`],
//! so the only dialect decisions made here are function shapes and the
//! operators some dialects lack.

use joinery_types::Dialect;

use super::{Sql, SqlChunk, Token};
use crate::compiler::{CompiledPredicate, ExpressionNode, MethodOp, Operand, Operator, ScalarFn};
use crate::error::{JoineryError, Result};

/// Renders `predicate` in emission order, honoring the per-node paren counts.
pub fn render_predicate(predicate: &CompiledPredicate, dialect: Dialect) -> Result<Sql<'static>> {
    crate::joinery_profile_scope!("sql_render", "predicate");
    let mut sql = Sql::empty();
    for node in predicate.iter() {
        for _ in 0..node.open_parens {
            sql.push_mut(Token::LPAREN);
        }
        sql.append_mut(render_node(node, dialect)?);
        for _ in 0..node.close_parens {
            sql.push_mut(Token::RPAREN);
        }
    }
    Ok(sql)
}

fn render_node(node: &ExpressionNode, dialect: Dialect) -> Result<Sql<'static>> {
    let comparison = match node.operator {
        Operator::AndAlso => return Ok(Sql::token(Token::AND)),
        Operator::OrElse => return Ok(Sql::token(Token::OR)),
        Operator::Constant(value) => {
            return Ok(Sql::from(SqlChunk::number(1))
                .push(Token::EQ)
                .push(SqlChunk::number(i64::from(value))));
        }
        Operator::Method(op) => return render_method(op, node, dialect),
        Operator::Equal => Token::EQ,
        Operator::NotEqual => Token::NE,
        Operator::GreaterThan => Token::GT,
        Operator::GreaterOrEqual => Token::GE,
        Operator::LessThan => Token::LT,
        Operator::LessOrEqual => Token::LE,
    };

    let left = render_operand(node.left.as_ref(), dialect);
    match node.right.as_ref() {
        Some(Operand::Null) if comparison == Token::EQ => Ok(left.push(Token::IS).push(Token::NULL)),
        Some(Operand::Null) => Ok(left.push(Token::IS).push(Token::NOT).push(Token::NULL)),
        right => Ok(left.push(comparison).append(render_operand(right, dialect))),
    }
}

fn render_method(op: MethodOp, node: &ExpressionNode, dialect: Dialect) -> Result<Sql<'static>> {
    let mut sql = render_operand(node.left.as_ref(), dialect);
    let args = &node.method_args;
    let negated = node.negated;

    match op {
        MethodOp::Contains | MethodOp::StartsWith | MethodOp::EndsWith => {
            if negated {
                sql.push_mut(Token::NOT);
            }
            sql.push_mut(Token::LIKE);
            sql.append_mut(like_pattern(op, args.first(), dialect));
        }
        MethodOp::Between => {
            if negated {
                sql.push_mut(Token::NOT);
            }
            sql.push_mut(Token::BETWEEN);
            sql.append_mut(render_operand(args.first(), dialect));
            sql.push_mut(Token::AND);
            sql.append_mut(render_operand(args.get(1), dialect));
        }
        MethodOp::In => {
            if negated {
                sql.push_mut(Token::NOT);
            }
            sql.push_mut(Token::IN);
            let items = args.iter().map(|arg| render_operand(Some(arg), dialect));
            sql.append_mut(Sql::join(items, Token::COMMA).parens());
        }
        MethodOp::After | MethodOp::Before => {
            let token = match (op, negated) {
                (MethodOp::After, false) => Token::GT,
                (MethodOp::After, true) => Token::LE,
                (_, false) => Token::LT,
                (_, true) => Token::GE,
            };
            sql.push_mut(token);
            sql.append_mut(render_operand(args.first(), dialect));
        }
        MethodOp::Matches => {
            let pattern = render_operand(args.first(), dialect);
            return match dialect {
                Dialect::Postgres => {
                    let token = if negated { Token::NOT_TILDE } else { Token::TILDE };
                    Ok(sql.push(token).append(pattern))
                }
                Dialect::MySql => {
                    if negated {
                        sql.push_mut(Token::NOT);
                    }
                    Ok(sql.push(Token::REGEXP).append(pattern))
                }
                Dialect::Oracle => {
                    let call = Sql::func("REGEXP_LIKE", sql.push(Token::COMMA).append(pattern));
                    Ok(if negated {
                        Sql::token(Token::NOT).append(call)
                    } else {
                        call
                    })
                }
                Dialect::SqlServer | Dialect::SqlLite => Err(JoineryError::DialectUnsupportedOperator {
                    operator: op.name(),
                    dialect,
                }),
            };
        }
    }
    Ok(sql)
}

/// LIKE right-hand side. Literal patterns already carry their wildcards;
/// column patterns get them concatenated in the dialect's own syntax.
fn like_pattern(op: MethodOp, arg: Option<&Operand>, dialect: Dialect) -> Sql<'static> {
    let value = render_operand(arg, dialect);
    if !matches!(arg, Some(Operand::Column { .. } | Operand::Function { .. })) {
        return value;
    }

    let percent = || Sql::from(SqlChunk::raw("'%'"));
    let mut parts = Vec::with_capacity(3);
    if op != MethodOp::StartsWith {
        parts.push(percent());
    }
    parts.push(value);
    if op != MethodOp::EndsWith {
        parts.push(percent());
    }

    match dialect {
        Dialect::MySql => Sql::func("CONCAT", Sql::join(parts, Token::COMMA)),
        Dialect::SqlServer => Sql::join(parts, Token::PLUS),
        Dialect::Postgres | Dialect::SqlLite | Dialect::Oracle => Sql::join(parts, Token::CONCAT),
    }
}

pub(crate) fn render_operand(operand: Option<&Operand>, dialect: Dialect) -> Sql<'static> {
    let Some(operand) = operand else {
        return Sql::token(Token::NULL);
    };
    match operand {
        Operand::Column { alias, name, .. } => Sql::from(SqlChunk::column(*alias, *name)),
        Operand::Param { name, .. } => Sql::from(SqlChunk::Param(name.clone())),
        Operand::Null => Sql::token(Token::NULL),
        Operand::Function { func, arg } => render_function(*func, render_operand(Some(arg), dialect), dialect),
    }
}

fn render_function(func: ScalarFn, arg: Sql<'static>, dialect: Dialect) -> Sql<'static> {
    let part = match func {
        ScalarFn::Upper => return Sql::func("UPPER", arg),
        ScalarFn::Lower => return Sql::func("LOWER", arg),
        ScalarFn::Trim => return Sql::func("TRIM", arg),
        ScalarFn::Abs => return Sql::func("ABS", arg),
        ScalarFn::Length if dialect == Dialect::SqlServer => return Sql::func("LEN", arg),
        ScalarFn::Length => return Sql::func("LENGTH", arg),
        ScalarFn::Round(digits) => {
            return Sql::func("ROUND", arg.push(Token::COMMA).push(SqlChunk::number(digits)));
        }
        ScalarFn::Year => ("YEAR", "'%Y'"),
        ScalarFn::Month => ("MONTH", "'%m'"),
        ScalarFn::Day => ("DAY", "'%d'"),
    };

    let (unit, format) = part;
    match dialect {
        Dialect::SqlServer => Sql::func(
            "DATEPART",
            Sql::from(SqlChunk::Keyword(unit)).push(Token::COMMA).append(arg),
        ),
        Dialect::SqlLite => {
            let strftime = Sql::func(
                "STRFTIME",
                Sql::from(SqlChunk::raw(format)).push(Token::COMMA).append(arg),
            );
            Sql::func(
                "CAST",
                strftime.push(Token::AS).push(SqlChunk::Keyword("INTEGER")),
            )
        }
        Dialect::Postgres | Dialect::MySql | Dialect::Oracle => Sql::func(
            "EXTRACT",
            Sql::from(SqlChunk::Keyword(unit)).push(Token::FROM).append(arg),
        ),
    }
}

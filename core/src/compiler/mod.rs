//! Predicate Expression Compiler.
//!
//! Turns a boolean [`Expr`] into an ordered, parenthesization-correct list
//! of [`ExpressionNode`]s in two passes over an index arena:
//!
//! 1. **Flatten** walks the tree pre-order with an explicit stack, pushing
//!    negations down and resolving every leaf: columns get their alias,
//!    literal-only subtrees are evaluated, and parameters are allocated left
//!    to right.
//! 2. **Linearize** emits the arena in-order with a second explicit stack and
//!    assigns parenthesis counts and emission positions by index arithmetic,
//!    never revisiting the source tree.
//!
//! Compilation is dialect independent; only rendering looks at the dialect.

mod eval;
mod node;

pub use node::{CompiledPredicate, ExpressionNode, MethodOp, Operand, Operator, ScalarFn};

use joinery_types::{FieldType, Value};
use smallvec::SmallVec;

use crate::alias::{AliasCode, AliasRegistry};
use crate::error::{JoineryError, Result};
use crate::expr::{BinaryOp, ColumnRef, Expr, Method};
use crate::params::ParameterSet;
use crate::schema::{Entity, TableRef};

/// How column references are qualified.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// Single-table statement: columns of `table` render bare.
    Unqualified(TableRef),
    /// Join session: every column renders with its table's alias.
    Aliased(&'a AliasRegistry),
}

impl<'a> Scope<'a> {
    pub fn unqualified<E: Entity>() -> Scope<'static> {
        Scope::Unqualified(E::table_ref())
    }

    pub fn aliased(registry: &'a AliasRegistry) -> Self {
        Scope::Aliased(registry)
    }

    fn resolve(&self, column: &ColumnRef) -> Result<Option<AliasCode>> {
        match self {
            Scope::Unqualified(table) if column.table == *table => Ok(None),
            Scope::Unqualified(_) => Err(JoineryError::AliasNotFound {
                table: column.table.name(),
            }),
            Scope::Aliased(registry) => registry.require(&column.table).map(Some),
        }
    }
}

/// Compiles `expr` against `scope`, registering literals in `params`.
///
/// On error `params` may hold parameters allocated before the failure; callers
/// discard the whole statement in that case.
pub fn compile(expr: &Expr, scope: &Scope<'_>, params: &mut ParameterSet) -> Result<CompiledPredicate> {
    crate::joinery_profile_scope!("compile", "predicate");
    let mut compiler = Compiler { scope, params };
    let arena = compiler.flatten(expr)?;
    Ok(linearize(arena))
}

struct Slot {
    node: Option<ExpressionNode>,
    parent: Option<usize>,
    children: [Option<usize>; 2],
}

struct Frame<'e> {
    expr: &'e Expr,
    negate: bool,
    parent: Option<usize>,
    side: usize,
}

struct Compiler<'s, 'p> {
    scope: &'s Scope<'s>,
    params: &'p mut ParameterSet,
}

impl Compiler<'_, '_> {
    // =========================================================================
    // Pass 1: flatten
    // =========================================================================

    fn flatten(&mut self, root: &Expr) -> Result<Vec<Slot>> {
        let mut arena: Vec<Slot> = Vec::new();
        let mut stack = vec![Frame {
            expr: root,
            negate: false,
            parent: None,
            side: 0,
        }];

        while let Some(frame) = stack.pop() {
            let node = match frame.expr {
                Expr::Not(inner) => {
                    stack.push(Frame {
                        expr: inner,
                        negate: !frame.negate,
                        ..frame
                    });
                    continue;
                }
                Expr::Binary { op, left, right } if op.is_connector() => {
                    let operator = if *op == BinaryOp::And {
                        Operator::AndAlso
                    } else {
                        Operator::OrElse
                    };
                    let operator = if frame.negate { operator.negate() } else { operator };
                    let index = arena.len();
                    // right first so the left subtree is resolved first
                    stack.push(Frame {
                        expr: right,
                        negate: frame.negate,
                        parent: Some(index),
                        side: 1,
                    });
                    stack.push(Frame {
                        expr: left,
                        negate: frame.negate,
                        parent: Some(index),
                        side: 0,
                    });
                    ExpressionNode::connector(operator)
                }
                leaf => self.leaf(leaf, frame.negate)?,
            };

            let index = arena.len();
            if let Some(parent) = frame.parent {
                arena[parent].children[frame.side] = Some(index);
            }
            arena.push(Slot {
                node: Some(node),
                parent: frame.parent,
                children: [None, None],
            });
        }
        Ok(arena)
    }

    fn leaf(&mut self, expr: &Expr, negate: bool) -> Result<ExpressionNode> {
        if !expr.is_entity_bound() {
            let value = eval::evaluate_bool(expr)?;
            return Ok(ExpressionNode::constant(value != negate));
        }

        match expr {
            Expr::Column(column) => {
                if column.ty != FieldType::Bool {
                    return Err(JoineryError::unsupported(expr, "non-boolean column used as a predicate"));
                }
                let left = self.column(column)?;
                let value = Value::Bool(!negate);
                let name = self.params.allocate(column.name, value.clone());
                Ok(ExpressionNode::leaf(
                    Operator::Equal,
                    Some(left),
                    Some(Operand::Param { name, value }),
                ))
            }
            Expr::Binary { op, left, right } if op.is_comparison() => {
                self.comparison(*op, left, right, negate)
            }
            Expr::Call {
                method,
                receiver,
                args,
            } if method.is_predicate() => self.method(expr, *method, receiver, args, negate),
            Expr::Not(inner) => self.leaf(inner, !negate),
            Expr::Binary { .. } => Err(JoineryError::unsupported(
                expr,
                "arithmetic expression used as a predicate",
            )),
            Expr::Call { .. } => Err(JoineryError::unsupported(expr, "scalar method used as a predicate")),
            Expr::Literal(_) | Expr::List(_) => {
                Err(JoineryError::unsupported(expr, "non-boolean expression used as a predicate"))
            }
        }
    }

    fn comparison(&mut self, op: BinaryOp, left: &Expr, right: &Expr, negate: bool) -> Result<ExpressionNode> {
        let mut operator = match op {
            BinaryOp::Eq => Operator::Equal,
            BinaryOp::Ne => Operator::NotEqual,
            BinaryOp::Gt => Operator::GreaterThan,
            BinaryOp::Ge => Operator::GreaterOrEqual,
            BinaryOp::Lt => Operator::LessThan,
            _ => Operator::LessOrEqual,
        };

        // keep the column on the left: `18 <= Age` becomes `Age >= 18`
        let (bound, other) = if left.is_entity_bound() {
            (left, right)
        } else {
            operator = operator.mirror();
            (right, left)
        };
        if negate {
            operator = operator.negate();
        }

        let left = self.operand(bound)?;
        let right = if other.is_entity_bound() {
            self.operand(other)?
        } else {
            match eval::evaluate(other)? {
                Value::Null if matches!(operator, Operator::Equal | Operator::NotEqual) => Operand::Null,
                Value::Null => {
                    return Err(JoineryError::unsupported(other, "ordering comparison with null"));
                }
                value => self.param(left.column_name(), value),
            }
        };
        Ok(ExpressionNode::leaf(operator, Some(left), Some(right)))
    }

    fn method(
        &mut self,
        expr: &Expr,
        method: Method,
        receiver: &Expr,
        args: &[Expr],
        negate: bool,
    ) -> Result<ExpressionNode> {
        let op = match method {
            Method::Contains => MethodOp::Contains,
            Method::StartsWith => MethodOp::StartsWith,
            Method::EndsWith => MethodOp::EndsWith,
            Method::Between => MethodOp::Between,
            Method::In => MethodOp::In,
            Method::After => MethodOp::After,
            Method::Before => MethodOp::Before,
            _ => MethodOp::Matches,
        };
        let hint = expr.first_column().map(|c| c.name);
        let arity = match op {
            MethodOp::Between => 2,
            _ => 1,
        };
        if args.len() != arity {
            return Err(JoineryError::unsupported(expr, "wrong number of method arguments"));
        }

        let receiver = self.argument(receiver, hint, None)?;
        let mut resolved: SmallVec<[Operand; 2]> = SmallVec::new();
        if op == MethodOp::In {
            let Expr::List(items) = &args[0] else {
                return Err(JoineryError::unsupported(expr, "IN expects a list"));
            };
            if items.is_empty() {
                // x IN () matches nothing
                return Ok(ExpressionNode::constant(negate));
            }
            for item in items {
                resolved.push(self.argument(item, hint, None)?);
            }
        } else {
            let wildcard = match op {
                MethodOp::Contains => Some(("%", "%")),
                MethodOp::StartsWith => Some(("", "%")),
                MethodOp::EndsWith => Some(("%", "")),
                _ => None,
            };
            for arg in args {
                resolved.push(self.argument(arg, hint, wildcard)?);
            }
        }
        Ok(ExpressionNode::method(op, receiver, resolved, negate))
    }

    /// Resolves a method receiver or argument to a column operand or a parameter.
    fn argument(&mut self, expr: &Expr, hint: Option<&'static str>, wildcard: Option<(&str, &str)>) -> Result<Operand> {
        if expr.is_entity_bound() {
            return self.operand(expr);
        }
        let value = match (eval::evaluate(expr)?, wildcard) {
            (Value::Null, _) => return Err(JoineryError::unsupported(expr, "null method argument")),
            (Value::String(s), Some((prefix, suffix))) => Value::String(format!("{prefix}{s}{suffix}")),
            (value, _) => value,
        };
        Ok(self.param(hint, value))
    }

    fn param(&mut self, column: Option<&str>, value: Value) -> Operand {
        let name = self.params.allocate(column.unwrap_or("p"), value.clone());
        Operand::Param { name, value }
    }

    fn column(&self, column: &ColumnRef) -> Result<Operand> {
        Ok(Operand::Column {
            alias: self.scope.resolve(column)?,
            name: column.name,
            ty: column.ty,
        })
    }

    /// Resolves an entity-bound operand: a column or a scalar function of one.
    fn operand(&mut self, expr: &Expr) -> Result<Operand> {
        match expr {
            Expr::Column(column) => self.column(column),
            Expr::Call {
                method,
                receiver,
                args,
            } => {
                let func = match method {
                    Method::ToUpper => ScalarFn::Upper,
                    Method::ToLower => ScalarFn::Lower,
                    Method::Trim => ScalarFn::Trim,
                    Method::Length => ScalarFn::Length,
                    Method::Abs => ScalarFn::Abs,
                    Method::Year => ScalarFn::Year,
                    Method::Month => ScalarFn::Month,
                    Method::Day => ScalarFn::Day,
                    Method::Round => match args.first().map(eval::evaluate) {
                        Some(Ok(Value::Int32(digits))) if args.len() == 1 => ScalarFn::Round(digits),
                        Some(Err(e)) => return Err(e),
                        _ => {
                            return Err(JoineryError::unsupported(
                                expr,
                                "rounding digits must be a literal int32",
                            ));
                        }
                    },
                    Method::Average => {
                        return Err(JoineryError::unsupported(expr, "average over entity columns"));
                    }
                    _ => {
                        return Err(JoineryError::unsupported(expr, "predicate method used as an operand"));
                    }
                };
                if !receiver.is_entity_bound() {
                    return Err(JoineryError::unsupported(
                        expr,
                        "scalar method arguments cannot reference columns",
                    ));
                }
                Ok(Operand::Function {
                    func,
                    arg: Box::new(self.operand(receiver)?),
                })
            }
            Expr::Binary { op, .. } if op.is_arithmetic() => {
                Err(JoineryError::unsupported(expr, "arithmetic over entity columns"))
            }
            _ => Err(JoineryError::unsupported(expr, "unsupported operand shape")),
        }
    }
}

// =============================================================================
// Pass 2: linearize
// =============================================================================

fn linearize(mut arena: Vec<Slot>) -> CompiledPredicate {
    if arena.is_empty() {
        return CompiledPredicate::default();
    }

    // A connector nested under a different connector is wrapped in parens.
    // Same-connector chains are associative and stay flat.
    for index in 0..arena.len() {
        let Some(parent) = arena[index].parent else {
            continue;
        };
        let (own, outer) = (operator_of(&arena, index), operator_of(&arena, parent));
        if !own.is_some_and(Operator::is_connector) || own == outer {
            continue;
        }
        let first = edge_leaf(&arena, index, 0);
        let last = edge_leaf(&arena, index, 1);
        if let Some(node) = arena[first].node.as_mut() {
            node.open_parens += 1;
        }
        if let Some(node) = arena[last].node.as_mut() {
            node.close_parens += 1;
        }
    }

    // in-order walk: left subtree, node, right subtree
    let mut order = Vec::with_capacity(arena.len());
    let mut stack: Vec<usize> = Vec::new();
    let mut current = Some(0);
    loop {
        while let Some(index) = current {
            stack.push(index);
            current = arena[index].children[0];
        }
        let Some(index) = stack.pop() else { break };
        order.push(index);
        current = arena[index].children[1];
    }

    let mut position = vec![0usize; arena.len()];
    for (pos, &index) in order.iter().enumerate() {
        position[index] = pos;
    }

    let mut nodes = Vec::with_capacity(order.len());
    for (pos, &index) in order.iter().enumerate() {
        let parent = arena[index].parent.map(|p| position[p]);
        if let Some(mut node) = arena[index].node.take() {
            node.parent_index = parent;
            node.order_position = pos;
            nodes.push(node);
        }
    }
    CompiledPredicate { nodes }
}

fn operator_of(arena: &[Slot], index: usize) -> Option<Operator> {
    arena[index].node.as_ref().map(|n| n.operator)
}

/// Leftmost (`side == 0`) or rightmost (`side == 1`) leaf under `index`.
fn edge_leaf(arena: &[Slot], mut index: usize, side: usize) -> usize {
    while let Some(child) = arena[index].children[side] {
        index = child;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Predicate, Scalar};
    use joinery_types::NaiveDateTime;

    crate::entity! {
        pub struct Person as "Person" {
            pub id: i32 => "Id",
            pub age: i32 => "Age",
            pub name: String => "Name",
            pub country: String => "Country",
            pub active: bool => "Active",
            pub score: Option<f64> => "Score",
            pub born: NaiveDateTime => "Born",
        }
    }

    crate::entity! {
        pub struct Pet as "Pet" {
            pub id: i32 => "Id",
        }
    }

    fn run(expr: &Expr) -> Result<(CompiledPredicate, ParameterSet)> {
        let mut params = ParameterSet::new();
        let compiled = compile(expr, &Scope::unqualified::<Person>(), &mut params)?;
        Ok((compiled, params))
    }

    fn operators(compiled: &CompiledPredicate) -> Vec<Operator> {
        compiled.iter().map(|n| n.operator).collect()
    }

    #[test]
    fn nested_connector_is_parenthesized() {
        let p = Person::AGE
            .ge(18)
            .and(Person::COUNTRY.eq("US").or(Person::COUNTRY.eq("CA")));
        let (compiled, params) = run(p.expr()).unwrap();

        assert_eq!(
            operators(&compiled),
            [
                Operator::GreaterOrEqual,
                Operator::AndAlso,
                Operator::Equal,
                Operator::OrElse,
                Operator::Equal,
            ]
        );
        let parens: Vec<_> = compiled.iter().map(|n| (n.open_parens, n.close_parens)).collect();
        assert_eq!(parens, [(0, 0), (0, 0), (1, 0), (0, 0), (0, 1)]);
        let parents: Vec<_> = compiled.iter().map(|n| n.parent_index).collect();
        assert_eq!(parents, [Some(1), None, Some(3), Some(1), Some(3)]);
        let positions: Vec<_> = compiled.iter().map(|n| n.order_position).collect();
        assert_eq!(positions, [0, 1, 2, 3, 4]);

        let names: Vec<_> = params.names().collect();
        assert_eq!(names, ["Age0", "Country1", "Country2"]);
        assert_eq!(params.get("Country2"), Some(&Value::from("CA")));
    }

    #[test]
    fn compilation_is_deterministic() {
        let p = (Person::NAME.contains("a") | Person::AGE.between(1, 9)) & !Person::ACTIVE;
        assert_eq!(run(p.expr()).unwrap().0, run(p.expr()).unwrap().0);
    }

    #[test]
    fn same_connector_chains_stay_flat() {
        let p = Person::AGE.gt(1) & Person::AGE.lt(9) & Person::ACTIVE.is_true();
        let (compiled, _) = run(p.expr()).unwrap();
        assert!(compiled.iter().all(|n| n.open_parens == 0 && n.close_parens == 0));
        assert_eq!(compiled.len(), 5);
    }

    #[test]
    fn paren_counts_accumulate() {
        // (a OR (b AND c)) AND d
        let p = (Person::ID.eq(1) | (Person::ID.eq(2) & Person::ID.eq(3))) & Person::ID.eq(4);
        let (compiled, _) = run(p.expr()).unwrap();
        let parens: Vec<_> = compiled.iter().map(|n| (n.open_parens, n.close_parens)).collect();
        assert_eq!(
            parens,
            [(1, 0), (0, 0), (1, 0), (0, 0), (0, 2), (0, 0), (0, 0)]
        );
    }

    #[test]
    fn negation_is_pushed_down() {
        let p = !(Person::AGE.gt(18) & Person::ACTIVE.is_true());
        let (compiled, params) = run(p.expr()).unwrap();
        assert_eq!(
            operators(&compiled),
            [Operator::LessOrEqual, Operator::OrElse, Operator::Equal]
        );
        assert_eq!(params.get("Active1"), Some(&Value::Bool(false)));
    }

    #[test]
    fn bare_boolean_columns() {
        let (compiled, params) = run(Predicate::from(Person::ACTIVE).expr()).unwrap();
        assert_eq!(operators(&compiled), [Operator::Equal]);
        assert_eq!(params.get("Active0"), Some(&Value::Bool(true)));

        let (_, params) = run((!Person::ACTIVE).expr()).unwrap();
        assert_eq!(params.get("Active0"), Some(&Value::Bool(false)));
    }

    #[test]
    fn literal_on_the_left_is_mirrored() {
        let e = Expr::binary(BinaryOp::Le, Expr::literal(18), Person::AGE.into_expr());
        let (compiled, _) = run(&e).unwrap();
        let node = &compiled.nodes[0];
        assert_eq!(node.operator, Operator::GreaterOrEqual);
        assert!(matches!(node.left, Some(Operand::Column { name: "Age", .. })));
    }

    #[test]
    fn null_comparisons() {
        let (compiled, params) = run(Person::SCORE.is_null().expr()).unwrap();
        assert_eq!(compiled.nodes[0].right, Some(Operand::Null));
        assert!(params.is_empty());

        let (compiled, _) = run((!Person::SCORE.is_null()).expr()).unwrap();
        assert_eq!(compiled.nodes[0].operator, Operator::NotEqual);

        let e = Expr::binary(BinaryOp::Gt, Person::SCORE.into_expr(), Expr::Literal(Value::Null));
        assert!(matches!(run(&e), Err(JoineryError::UnsupportedExpression { .. })));
    }

    #[test]
    fn literal_subtrees_are_evaluated() {
        let p = Person::AGE.gt(Scalar::<Person, i32>::literal(40) + 2);
        let (compiled, params) = run(p.expr()).unwrap();
        assert_eq!(params.get("Age0"), Some(&Value::Int32(42)));
        assert_eq!(compiled.len(), 1);
    }

    #[test]
    fn literal_comparisons_fold() {
        let e = Expr::binary(BinaryOp::Eq, Expr::literal(1), Expr::literal(1));
        let (compiled, params) = run(&e).unwrap();
        assert_eq!(operators(&compiled), [Operator::Constant(true)]);
        assert!(params.is_empty());
    }

    #[test]
    fn empty_in_lists_fold() {
        let (compiled, _) = run(Person::ID.is_in(Vec::<i32>::new()).expr()).unwrap();
        assert_eq!(operators(&compiled), [Operator::Constant(false)]);
        let (compiled, _) = run(Person::ID.not_in(Vec::<i32>::new()).expr()).unwrap();
        assert_eq!(operators(&compiled), [Operator::Constant(true)]);
    }

    #[test]
    fn method_parameters_are_named_after_the_column() {
        let p = Person::AGE.between(18, 65) & Person::NAME.starts_with("Ad");
        let (compiled, params) = run(p.expr()).unwrap();
        assert_eq!(params.names().collect::<Vec<_>>(), ["Age0", "Age1", "Name2"]);
        assert_eq!(params.get("Name2"), Some(&Value::from("Ad%")));
        assert_eq!(
            compiled.nodes[0].operator,
            Operator::Method(MethodOp::Between)
        );
    }

    #[test]
    fn arithmetic_over_columns_fails_loudly() {
        let p = Person::AGE.eq(Person::ID + 1);
        let err = run(p.expr()).unwrap_err();
        match err {
            JoineryError::UnsupportedExpression { expr, reason } => {
                assert_eq!(expr, "(Person.Id + 1)");
                assert_eq!(reason, "arithmetic over entity columns");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn average_over_columns_is_unsupported() {
        let e = Expr::binary(
            BinaryOp::Gt,
            Person::SCORE.into_expr(),
            Expr::call(Method::Average, Expr::List(vec![Person::SCORE.into_expr()]), vec![]),
        );
        assert!(matches!(run(&e), Err(JoineryError::UnsupportedExpression { .. })));
    }

    #[test]
    fn foreign_columns_need_an_alias() {
        let e = Expr::binary(BinaryOp::Eq, Pet::ID.into_expr(), Expr::literal(1));
        assert!(matches!(run(&e), Err(JoineryError::AliasNotFound { table: "Pet" })));
    }

    #[test]
    fn scalar_functions_wrap_the_column() {
        let p = Person::NAME.upper().eq("ADA");
        let (compiled, params) = run(p.expr()).unwrap();
        assert!(matches!(
            &compiled.nodes[0].left,
            Some(Operand::Function { func: ScalarFn::Upper, .. })
        ));
        assert!(params.contains("Name0"));
    }
}

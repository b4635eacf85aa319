use compact_str::CompactString;
use joinery_types::{FieldType, Value};
use smallvec::SmallVec;

use crate::alias::AliasCode;

/// Operator of one compiled node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    AndAlso,
    OrElse,
    Method(MethodOp),
    /// A comparison folded at compile time; renders `1 = 1` or `1 = 0`.
    Constant(bool),
}

impl Operator {
    #[inline]
    pub const fn is_connector(self) -> bool {
        matches!(self, Operator::AndAlso | Operator::OrElse)
    }

    /// The operator that holds exactly when `self` does not.
    pub(crate) const fn negate(self) -> Self {
        match self {
            Operator::Equal => Operator::NotEqual,
            Operator::NotEqual => Operator::Equal,
            Operator::GreaterThan => Operator::LessOrEqual,
            Operator::GreaterOrEqual => Operator::LessThan,
            Operator::LessThan => Operator::GreaterOrEqual,
            Operator::LessOrEqual => Operator::GreaterThan,
            Operator::AndAlso => Operator::OrElse,
            Operator::OrElse => Operator::AndAlso,
            Operator::Constant(b) => Operator::Constant(!b),
            Operator::Method(m) => Operator::Method(m),
        }
    }

    /// The operator after swapping operands: `18 <= x` is `x >= 18`.
    pub(crate) const fn mirror(self) -> Self {
        match self {
            Operator::GreaterThan => Operator::LessThan,
            Operator::GreaterOrEqual => Operator::LessOrEqual,
            Operator::LessThan => Operator::GreaterThan,
            Operator::LessOrEqual => Operator::GreaterOrEqual,
            other => other,
        }
    }
}

/// Method nodes that need dialect-specific rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodOp {
    Contains,
    StartsWith,
    EndsWith,
    Between,
    In,
    After,
    Before,
    Matches,
}

impl MethodOp {
    pub const fn name(self) -> &'static str {
        match self {
            MethodOp::Contains => "Contains",
            MethodOp::StartsWith => "StartsWith",
            MethodOp::EndsWith => "EndsWith",
            MethodOp::Between => "Between",
            MethodOp::In => "In",
            MethodOp::After => "After",
            MethodOp::Before => "Before",
            MethodOp::Matches => "Matches",
        }
    }
}

/// Scalar functions applied to a column operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarFn {
    Upper,
    Lower,
    Trim,
    Length,
    Round(i32),
    Abs,
    Year,
    Month,
    Day,
}

/// One side of a comparison or a method argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Column reference, qualified by alias in join scopes.
    Column {
        alias: Option<AliasCode>,
        name: &'static str,
        ty: FieldType,
    },
    /// Literal already evaluated and registered in the parameter set.
    Param { name: CompactString, value: Value },
    /// `NULL`; only the right side of `=`/`<>`, rendered `IS [NOT] NULL`.
    Null,
    Function { func: ScalarFn, arg: Box<Operand> },
}

impl Operand {
    /// Column name a parameter compared against this operand is named after.
    pub fn column_name(&self) -> Option<&'static str> {
        match self {
            Operand::Column { name, .. } => Some(name),
            Operand::Function { arg, .. } => arg.column_name(),
            Operand::Param { .. } | Operand::Null => None,
        }
    }
}

/// One unit of a compiled predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    pub operator: Operator,
    /// Absent on connector and constant nodes.
    pub left: Option<Operand>,
    pub right: Option<Operand>,
    /// Arguments of method nodes (bounds, list items, patterns).
    pub method_args: SmallVec<[Operand; 2]>,
    /// Method nodes only: render the negated form (`NOT LIKE`, `NOT IN`, ...).
    pub negated: bool,
    /// Emission position of the connector this node hangs under.
    pub parent_index: Option<usize>,
    /// Number of `(` emitted before this node.
    pub open_parens: u16,
    /// Number of `)` emitted after this node.
    pub close_parens: u16,
    pub order_position: usize,
}

impl ExpressionNode {
    pub(crate) fn leaf(operator: Operator, left: Option<Operand>, right: Option<Operand>) -> Self {
        Self {
            operator,
            left,
            right,
            method_args: SmallVec::new(),
            negated: false,
            parent_index: None,
            open_parens: 0,
            close_parens: 0,
            order_position: 0,
        }
    }

    pub(crate) fn method(
        op: MethodOp,
        receiver: Operand,
        args: SmallVec<[Operand; 2]>,
        negated: bool,
    ) -> Self {
        Self {
            method_args: args,
            negated,
            ..Self::leaf(Operator::Method(op), Some(receiver), None)
        }
    }

    pub(crate) fn connector(operator: Operator) -> Self {
        Self::leaf(operator, None, None)
    }

    pub(crate) fn constant(value: bool) -> Self {
        Self::leaf(Operator::Constant(value), None, None)
    }

    #[inline]
    pub fn is_connector(&self) -> bool {
        self.operator.is_connector()
    }
}

/// Output of compiling one predicate: nodes in emission order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledPredicate {
    pub nodes: Vec<ExpressionNode>,
}

impl CompiledPredicate {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the predicate contains an `AND`/`OR`.
    pub fn has_connectors(&self) -> bool {
        self.nodes.iter().any(ExpressionNode::is_connector)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpressionNode> {
        self.nodes.iter()
    }
}

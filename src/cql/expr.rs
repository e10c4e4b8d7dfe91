//! Expression tree produced by the CQL parser
//!
//! Operator symbols follow the classic filter-tree notation
//! (`==`, `!=`, `..`, `~`, `&&`, `||`, `!`); [`map_comparator`] and
//! [`map_logical`] translate them to the keywords shown in filter rows.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::EqualTo => "==",
            ComparisonOp::NotEqualTo => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqualTo => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqualTo => ">=",
            ComparisonOp::Like => "~",
        }
    }

    /// Operator from its CQL spelling
    pub fn from_cql(op: &str) -> Option<ComparisonOp> {
        match op {
            "=" => Some(ComparisonOp::EqualTo),
            "<>" | "!=" => Some(ComparisonOp::NotEqualTo),
            "<" => Some(ComparisonOp::LessThan),
            "<=" => Some(ComparisonOp::LessThanOrEqualTo),
            ">" => Some(ComparisonOp::GreaterThan),
            ">=" => Some(ComparisonOp::GreaterThanOrEqualTo),
            "LIKE" => Some(ComparisonOp::Like),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    /// Unquoted form used as a filter-row value
    pub fn as_row_value(&self) -> String {
        match self {
            Literal::Number(n) => n.to_string(),
            Literal::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Text(text) => f.write_str(&quote_text(text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Comparison {
        property: String,
        op: ComparisonOp,
        value: Literal,
    },
    Between {
        property: String,
        low: Literal,
        high: Literal,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
}

impl Expr {
    pub fn symbol(&self) -> &'static str {
        match self {
            Expr::Comparison { op, .. } => op.symbol(),
            Expr::Between { .. } => "..",
            Expr::Logical { op, .. } => op.symbol(),
            Expr::Not(_) => "!",
        }
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
        Expr::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Expr::Comparison { .. } | Expr::Between { .. })
    }

    /// Nesting depth of logical and NOT nodes above the comparisons
    pub fn depth(&self) -> usize {
        match self {
            Expr::Comparison { .. } | Expr::Between { .. } => 0,
            Expr::Logical { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expr::Not(inner) => 1 + inner.depth(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
            if expr.is_leaf() {
                write!(f, "{}", expr)
            } else {
                write!(f, "({})", expr)
            }
        }

        match self {
            Expr::Comparison {
                property,
                op,
                value,
            } => write!(
                f,
                "{} {} {}",
                quote_ident(property),
                map_comparator(op.symbol()),
                value
            ),
            Expr::Between {
                property,
                low,
                high,
            } => write!(f, "{} BETWEEN {} AND {}", quote_ident(property), low, high),
            Expr::Logical { op, left, right } => {
                operand(f, left)?;
                write!(f, " {} ", map_logical(op.symbol()))?;
                operand(f, right)
            }
            Expr::Not(inner) => {
                write!(f, "NOT ")?;
                operand(f, inner)
            }
        }
    }
}

/// Single-quoted string literal with `\` and `'` escaped
pub fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Double-quoted attribute name; embedded `"` is doubled
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Tree comparison symbol to filter-row comparator
pub fn map_comparator(symbol: &str) -> String {
    match symbol {
        "==" => "=",
        ".." => "BETWEEN",
        "~" => "LIKE",
        "!=" => "<>",
        other => other,
    }
    .to_string()
}

/// Tree logical symbol to filter-row operator
pub fn map_logical(symbol: &str) -> String {
    match symbol {
        "&&" => "AND",
        "||" => "OR",
        "!" => "NOT",
        other => other,
    }
    .to_string()
}

//! CQL predicates and their filter-row projection

pub mod expr;
pub mod filter;
pub mod lexer;
pub mod parser;

pub use expr::{map_comparator, map_logical, ComparisonOp, Expr, Literal, LogicalOp};
pub use filter::{apply_rows_to_rule, read_cql, rows_to_cql, FilterForm, FilterRow};
pub use parser::parse;

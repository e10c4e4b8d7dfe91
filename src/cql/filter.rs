//! Bridge between editable filter rows and the CQL string stored on a rule
//!
//! A row's `operator` joins it to the *next* emitted row. The projection is
//! lossy (grouping is flattened), but every row survives a round trip with
//! the same attribute, comparator and value.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::expr::{map_comparator, map_logical, quote_ident, quote_text, Expr, LogicalOp};
use super::lexer::{tokenize, Token, TokenKind};
use super::parser::parse;
use crate::errors::CqlError;
use crate::style::Rule;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FilterRow {
    pub attribute: String,
    pub comparator: String,
    pub value: String,
    pub operator: String,
}

impl FilterRow {
    pub fn new(attribute: &str, comparator: &str, value: &str, operator: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            comparator: comparator.to_string(),
            value: value.to_string(),
            operator: operator.to_string(),
        }
    }

    /// The clause for this row, or `None` when the row must be skipped
    fn to_clause(&self) -> Option<String> {
        if self.attribute.trim().is_empty() {
            return None;
        }

        let comparator = match self.comparator.trim() {
            "" => "=",
            other => other,
        };

        let attribute = quote_ident(&self.attribute);
        if comparator.eq_ignore_ascii_case("BETWEEN") {
            let (low, high) = match split_bounds(&self.value) {
                Some(bounds) => bounds,
                None => {
                    debug!("Skipping BETWEEN row on {} with incomplete bounds", self.attribute);
                    return None;
                }
            };
            return Some(format!(
                "{} BETWEEN {} AND {}",
                attribute,
                bound_literal(low),
                bound_literal(high)
            ));
        }

        Some(format!("{} {} {}", attribute, comparator, quote_text(&self.value)))
    }
}

/// Split a `low,high` BETWEEN value at the first comma outside quotes
fn split_bounds(value: &str) -> Option<(&str, &str)> {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quote => escaped = true,
            '\'' => in_quote = !in_quote,
            ',' if !in_quote => {
                let low = value[..i].trim();
                let high = value[i + 1..].trim();
                if low.is_empty() || high.is_empty() {
                    return None;
                }
                return Some((low, high));
            }
            _ => {}
        }
    }
    None
}

/// Numbers and already-quoted strings pass through; anything else is quoted
fn bound_literal(bound: &str) -> String {
    match tokenize(bound).as_deref() {
        Ok(
            [Token {
                kind: TokenKind::Number(_) | TokenKind::Str(_),
                ..
            }],
        ) => bound.to_string(),
        _ => quote_text(bound),
    }
}

/// Rows as shown by the filter form
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterForm {
    pub rows: Vec<FilterRow>,
    /// Set when the stored CQL could not be projected onto rows; the single
    /// row's `value` then holds the raw CQL for free-text editing
    pub read_failed: bool,
}

impl FilterForm {
    /// Free-text form holding `cql` verbatim
    pub fn expert(cql: &str) -> Self {
        Self {
            rows: vec![FilterRow {
                value: cql.to_string(),
                ..Default::default()
            }],
            read_failed: true,
        }
    }

    pub fn from_rule(rule: &Rule) -> Self {
        match rule.filter.as_deref() {
            Some(cql) if !cql.trim().is_empty() => read_cql(cql),
            _ => Self {
                rows: vec![FilterRow::default()],
                read_failed: false,
            },
        }
    }

    pub fn to_cql(&self) -> String {
        if self.read_failed {
            return self
                .rows
                .first()
                .map(|row| row.value.trim().to_string())
                .unwrap_or_default();
        }
        rows_to_cql(&self.rows)
    }

    /// True when any structured row is missing its attribute
    pub fn attribute_missing(&self) -> bool {
        !self.read_failed && self.rows.iter().any(|row| row.attribute.trim().is_empty())
    }
}

/// Build a CQL predicate from filter rows.
///
/// Rows without an attribute, and BETWEEN rows without two bounds, are
/// skipped. A row's operator is placed before the next emitted row; an
/// empty operator joins with `AND`.
pub fn rows_to_cql(rows: &[FilterRow]) -> String {
    let mut query = String::new();
    let mut pending_operator: Option<&str> = None;

    for row in rows {
        let clause = match row.to_clause() {
            Some(clause) => clause,
            None => continue,
        };
        if !query.is_empty() {
            let operator = pending_operator
                .filter(|op| !op.is_empty())
                .unwrap_or("AND");
            query.push(' ');
            query.push_str(operator);
            query.push(' ');
        }
        query.push_str(&clause);
        pending_operator = Some(row.operator.trim());
    }

    query
}

/// Project a stored CQL predicate onto filter rows.
///
/// Never fails: unparsable or unprojectable input yields an expert form.
pub fn read_cql(cql: &str) -> FilterForm {
    let result = parse(cql).and_then(|expr| {
        let mut rows = Vec::new();
        collect_rows(&expr, &mut rows)?;
        Ok(rows)
    });

    match result {
        Ok(rows) => FilterForm {
            rows,
            read_failed: false,
        },
        Err(err) => {
            warn!("Falling back to expert filter mode: {}", err);
            FilterForm::expert(cql)
        }
    }
}

fn collect_rows(expr: &Expr, rows: &mut Vec<FilterRow>) -> Result<(), CqlError> {
    match expr {
        Expr::Comparison {
            property,
            op,
            value,
        } => {
            rows.push(FilterRow {
                attribute: property.clone(),
                comparator: map_comparator(op.symbol()),
                value: value.as_row_value(),
                operator: String::new(),
            });
            Ok(())
        }
        Expr::Between {
            property,
            low,
            high,
        } => {
            rows.push(FilterRow {
                attribute: property.clone(),
                comparator: map_comparator(expr.symbol()),
                value: format!("{},{}", low, high),
                operator: String::new(),
            });
            Ok(())
        }
        Expr::Logical {
            op: LogicalOp::And,
            left,
            right,
        } if matches!(right.as_ref(), Expr::Not(inner) if inner.is_leaf()) => {
            collect_rows(left, rows)?;
            set_last_operator(rows, map_logical("!"));
            if let Expr::Not(inner) = right.as_ref() {
                collect_rows(inner, rows)?;
            }
            Ok(())
        }
        Expr::Logical { op, left, right } => {
            collect_rows(left, rows)?;
            set_last_operator(rows, map_logical(op.symbol()));
            collect_rows(right, rows)
        }
        Expr::Not(_) => Err(CqlError::Unsupported(expr.to_string())),
    }
}

fn set_last_operator(rows: &mut [FilterRow], operator: String) {
    if let Some(last) = rows.last_mut() {
        last.operator = operator;
    }
}

/// Write the CQL built from `rows` into the rule's filter.
///
/// An empty result leaves the existing filter untouched. Returns whether
/// the filter was written.
pub fn apply_rows_to_rule(rule: &mut Rule, rows: &[FilterRow]) -> bool {
    let query = rows_to_cql(rows);
    if query.is_empty() {
        return false;
    }
    debug!("Setting filter of rule {}: {}", rule.name, query);
    rule.filter = Some(query);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_is_quoted() {
        let rows = vec![FilterRow::new("pop", ">", "1000", "")];
        assert_eq!(rows_to_cql(&rows), r#""pop" > '1000'"#);
    }

    #[test]
    fn quotes_in_text_values_are_escaped() {
        let rows = vec![FilterRow::new("name", "=", "l'eau", "")];
        assert_eq!(rows_to_cql(&rows), r#""name" = 'l\'eau'"#);
    }

    #[test]
    fn operator_joins_to_next_row() {
        let rows = vec![
            FilterRow::new("a", "=", "1", "OR"),
            FilterRow::new("b", "<", "2", "AND"),
            FilterRow::new("c", "LIKE", "x%", "OR"),
        ];
        assert_eq!(
            rows_to_cql(&rows),
            r#""a" = '1' OR "b" < '2' AND "c" LIKE 'x%'"#
        );
    }

    #[test]
    fn skipped_rows_do_not_consume_operators() {
        let rows = vec![
            FilterRow::new("a", "=", "1", "OR"),
            FilterRow::new("", "=", "ignored", "AND"),
            FilterRow::new("h", "BETWEEN", "5,", "AND"),
            FilterRow::new("b", "=", "2", ""),
        ];
        assert_eq!(rows_to_cql(&rows), r#""a" = '1' OR "b" = '2'"#);
    }

    #[test]
    fn between_row_emits_bounds() {
        let rows = vec![FilterRow::new("h", "BETWEEN", " 10 , 20 ", "")];
        assert_eq!(rows_to_cql(&rows), r#""h" BETWEEN 10 AND 20"#);
    }

    #[test]
    fn between_text_bounds_stay_quoted() {
        let form = read_cql(r#""date" BETWEEN '2020-01-01' AND '2021-01-01'"#);
        assert_eq!(
            form.rows,
            vec![FilterRow::new("date", "BETWEEN", "'2020-01-01','2021-01-01'", "")]
        );
        assert_eq!(
            form.to_cql(),
            r#""date" BETWEEN '2020-01-01' AND '2021-01-01'"#
        );

        let typed = vec![FilterRow::new("date", "BETWEEN", "2020-01-01, 2021-01-01", "")];
        assert_eq!(
            rows_to_cql(&typed),
            r#""date" BETWEEN '2020-01-01' AND '2021-01-01'"#
        );
    }

    #[test]
    fn commas_inside_quoted_bounds_do_not_split() {
        let form = read_cql(r#""code" BETWEEN '1,5' AND '2,5'"#);
        assert_eq!(form.rows[0].value, "'1,5','2,5'");
        assert_eq!(form.to_cql(), r#""code" BETWEEN '1,5' AND '2,5'"#);
    }

    #[test]
    fn trailing_backslash_survives_reopening() {
        let rows = vec![FilterRow::new("path", "=", r"C:\", "")];
        let cql = rows_to_cql(&rows);
        assert_eq!(cql, r#""path" = 'C:\\'"#);

        let form = read_cql(&cql);
        assert!(!form.read_failed);
        assert_eq!(form.rows, rows);
    }

    #[test]
    fn attribute_quotes_are_doubled() {
        let rows = vec![FilterRow::new(r#"odd"name"#, "=", "x", "")];
        let cql = rows_to_cql(&rows);
        assert_eq!(cql, r#""odd""name" = 'x'"#);

        let form = read_cql(&cql);
        assert!(!form.read_failed);
        assert_eq!(form.rows, rows);
    }

    #[test]
    fn reads_logical_expression_into_rows() {
        let form = read_cql(r#""a" = 'x' OR "h" BETWEEN 1 AND 2"#);
        assert!(!form.read_failed);
        assert_eq!(
            form.rows,
            vec![
                FilterRow::new("a", "=", "x", "OR"),
                FilterRow::new("h", "BETWEEN", "1,2", ""),
            ]
        );
    }

    #[test]
    fn reads_and_not_as_not_operator() {
        let form = read_cql(r#""a" <> 'x' AND NOT "b" LIKE 'y%'"#);
        assert_eq!(
            form.rows,
            vec![
                FilterRow::new("a", "<>", "x", "NOT"),
                FilterRow::new("b", "LIKE", "y%", ""),
            ]
        );
        assert_eq!(form.to_cql(), r#""a" <> 'x' NOT "b" LIKE 'y%'"#);
    }

    #[test]
    fn unparsable_cql_falls_back_to_expert_mode() {
        let form = read_cql("INTERSECTS(the_geom, POINT(1 2))");
        assert!(form.read_failed);
        assert_eq!(form.rows.len(), 1);
        assert_eq!(form.to_cql(), "INTERSECTS(the_geom, POINT(1 2))");
        assert!(!form.attribute_missing());
    }

    #[test]
    fn leading_not_falls_back_to_expert_mode() {
        let form = read_cql(r#"NOT "a" = 'x'"#);
        assert!(form.read_failed);
    }

    #[test]
    fn empty_rows_leave_filter_untouched() {
        let mut rule = Rule {
            filter: Some(r#""a" = '1'"#.to_string()),
            ..Default::default()
        };
        assert!(!apply_rows_to_rule(&mut rule, &[FilterRow::default()]));
        assert_eq!(rule.filter.as_deref(), Some(r#""a" = '1'"#));

        assert!(apply_rows_to_rule(
            &mut rule,
            &[FilterRow::new("b", "=", "2", "")]
        ));
        assert_eq!(rule.filter.as_deref(), Some(r#""b" = '2'"#));
    }

    #[test]
    fn form_from_rule_without_filter_has_blank_row() {
        let form = FilterForm::from_rule(&Rule::default());
        assert_eq!(form.rows, vec![FilterRow::default()]);
        assert!(form.attribute_missing());
    }
}

//! Recursive-descent parser for CQL predicates
//!
//! ```text
//! or         := and ( OR and )*
//! and        := unary ( ( AND | NOT ) unary )*     infix NOT reads as AND NOT
//! unary      := NOT unary | '(' or ')' | comparison
//! comparison := ident op literal
//!             | ident LIKE literal
//!             | ident BETWEEN literal AND literal
//! ```

use super::expr::{ComparisonOp, Expr, Literal, LogicalOp};
use super::lexer::{tokenize, Token, TokenKind};
use crate::errors::CqlError;

pub fn parse(input: &str) -> Result<Expr, CqlError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CqlError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(CqlError::UnexpectedToken {
            found: token.kind.to_string(),
            expected: "end of expression",
            offset: token.offset,
        }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, CqlError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(CqlError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr, CqlError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, CqlError> {
        let mut left = self.parse_unary()?;
        loop {
            if self.eat(&TokenKind::And) {
                let right = self.parse_unary()?;
                left = Expr::logical(LogicalOp::And, left, right);
            } else if self.eat(&TokenKind::Not) {
                let right = self.parse_unary()?;
                left = Expr::logical(LogicalOp::And, left, Expr::Not(Box::new(right)));
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, CqlError> {
        if self.eat(&TokenKind::Not) {
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        if self.eat(&TokenKind::LParen) {
            let inner = self.parse_or()?;
            let token = self.next()?;
            if token.kind != TokenKind::RParen {
                return Err(CqlError::UnexpectedToken {
                    found: token.kind.to_string(),
                    expected: "')'",
                    offset: token.offset,
                });
            }
            return Ok(inner);
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, CqlError> {
        let token = self.next()?;
        let property = match token.kind {
            TokenKind::Ident(name) => name,
            other => {
                return Err(CqlError::UnexpectedToken {
                    found: other.to_string(),
                    expected: "attribute name",
                    offset: token.offset,
                })
            }
        };

        let token = self.next()?;
        match token.kind {
            TokenKind::Op(op) => {
                let op = ComparisonOp::from_cql(op).ok_or(CqlError::UnexpectedToken {
                    found: op.to_string(),
                    expected: "comparison operator",
                    offset: token.offset,
                })?;
                let value = self.parse_literal()?;
                Ok(Expr::Comparison {
                    property,
                    op,
                    value,
                })
            }
            TokenKind::Like => {
                let value = self.parse_literal()?;
                Ok(Expr::Comparison {
                    property,
                    op: ComparisonOp::Like,
                    value,
                })
            }
            TokenKind::Between => {
                let low = self.parse_literal()?;
                let token = self.next()?;
                if token.kind != TokenKind::And {
                    return Err(CqlError::UnexpectedToken {
                        found: token.kind.to_string(),
                        expected: "AND",
                        offset: token.offset,
                    });
                }
                let high = self.parse_literal()?;
                Ok(Expr::Between {
                    property,
                    low,
                    high,
                })
            }
            other => Err(CqlError::UnexpectedToken {
                found: other.to_string(),
                expected: "comparison operator",
                offset: token.offset,
            }),
        }
    }

    fn parse_literal(&mut self) -> Result<Literal, CqlError> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Str(text) => Ok(Literal::Text(text)),
            TokenKind::Number(n) => Ok(Literal::Number(n)),
            other => Err(CqlError::UnexpectedToken {
                found: other.to_string(),
                expected: "literal",
                offset: token.offset,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(property: &str, op: ComparisonOp, value: Literal) -> Expr {
        Expr::Comparison {
            property: property.to_string(),
            op,
            value,
        }
    }

    #[test]
    fn parses_single_comparison() {
        assert_eq!(
            parse(r#""pop" > '1000'"#).unwrap(),
            comparison(
                "pop",
                ComparisonOp::GreaterThan,
                Literal::Text("1000".to_string())
            )
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse("a = 1 OR b = 2 AND c = 3").unwrap();
        match expr {
            Expr::Logical {
                op: LogicalOp::Or,
                right,
                ..
            } => assert_eq!(right.symbol(), "&&"),
            other => panic!("Expected OR at the root, got {:?}", other),
        }
    }

    #[test]
    fn infix_not_reads_as_and_not() {
        let expr = parse("a = 1 NOT b = 2").unwrap();
        assert_eq!(
            expr,
            Expr::logical(
                LogicalOp::And,
                comparison("a", ComparisonOp::EqualTo, Literal::Number(1.0)),
                Expr::Not(Box::new(comparison(
                    "b",
                    ComparisonOp::EqualTo,
                    Literal::Number(2.0)
                ))),
            )
        );
    }

    #[test]
    fn between_consumes_its_own_and() {
        let expr = parse(r#""h" BETWEEN 1 AND 5 AND "k" LIKE 'x%'"#).unwrap();
        assert_eq!(expr.symbol(), "&&");
        if let Expr::Logical { left, right, .. } = expr {
            assert_eq!(left.symbol(), "..");
            assert_eq!(right.symbol(), "~");
        }
    }

    #[test]
    fn parentheses_group() {
        let expr = parse("(a = 1 OR b = 2) AND c <> 'z'").unwrap();
        assert_eq!(expr.symbol(), "&&");
        assert_eq!(expr.depth(), 2);
    }

    #[test]
    fn reports_errors() {
        assert_eq!(parse("   "), Err(CqlError::Empty));
        assert_eq!(parse("a ="), Err(CqlError::UnexpectedEnd));
        assert!(matches!(
            parse("a = b"),
            Err(CqlError::UnexpectedToken {
                expected: "literal",
                ..
            })
        ));
        assert!(matches!(
            parse("a = 1 b = 2"),
            Err(CqlError::UnexpectedToken {
                expected: "end of expression",
                ..
            })
        ));
    }
}

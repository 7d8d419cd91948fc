//! Recursive-descent parser for gate parameter expressions.
//!
//! Grammar (standard precedence, left-associative):
//! ```text
//! expr   := term { ("+" | "-") term }
//! term   := unary { ("*" | "/") unary }
//! unary  := "-" unary | atom
//! atom   := number | "pi" | identifier | "(" expr ")"
//! ```

use arvak_ir::ParameterExpression;

use crate::lexer::{self, Token};

/// Parse a parameter expression such as `pi/4` or `2*theta`.
pub fn parse_expression(source: &str) -> Option<ParameterExpression> {
    let tokens = lexer::tokenize(source)?;
    let mut parser = ExprParser { tokens: &tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    Some(expr)
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn expr(&mut self) -> Option<ParameterExpression> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    lhs = lhs + self.term()?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    lhs = lhs - self.term()?;
                }
                _ => break,
            }
        }
        Some(lhs)
    }

    fn term(&mut self) -> Option<ParameterExpression> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    lhs = lhs * self.unary()?;
                }
                Some(Token::Slash) => {
                    self.bump();
                    lhs = lhs / self.unary()?;
                }
                _ => break,
            }
        }
        Some(lhs)
    }

    fn unary(&mut self) -> Option<ParameterExpression> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.bump();
            return Some(-self.unary()?);
        }
        self.atom()
    }

    fn atom(&mut self) -> Option<ParameterExpression> {
        match self.bump()?.clone() {
            Token::Number(v) => Some(ParameterExpression::constant(v)),
            Token::Pi => Some(ParameterExpression::pi()),
            Token::Identifier(name) => Some(ParameterExpression::symbol(name)),
            Token::LParen => {
                let inner = self.expr()?;
                matches!(self.bump(), Some(Token::RParen)).then_some(inner)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pi_over_four() {
        let expr = parse_expression("pi/4").unwrap();
        assert!((expr.as_f64().unwrap() - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_parse_negative_constant() {
        let expr = parse_expression("-1.5").unwrap();
        assert_eq!(expr.as_f64(), Some(-1.5));
    }

    #[test]
    fn test_parse_symbol() {
        let expr = parse_expression("theta").unwrap();
        assert!(expr.is_symbolic());
    }

    #[test]
    fn test_parse_parenthesized() {
        let expr = parse_expression("2*(pi/4)").unwrap();
        assert!((expr.as_f64().unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}

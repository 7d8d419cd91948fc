//! Tokenizer for arithmetic parameter expressions and assertion bodies.
//!
//! The bulk of the dialect (declarations, gate calls, blocks) is recognized
//! by [`crate::preprocessor`] directly from source text, matching the way the
//! reference debugger treats each `;`-terminated fragment. This lexer only
//! covers the numeric/identifier grammar nested inside gate argument lists
//! and assertion bodies, e.g. `rx(pi/4)` or `assert-eq q[0] { 0.707 }`.

use logos::Logos;

/// Tokens for arithmetic parameter expressions.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// The constant `pi`.
    #[token("pi")]
    #[token("π")]
    Pi,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

/// Tokenize an expression fragment, returning `None` on any invalid token.
pub fn tokenize(source: &str) -> Option<Vec<Token>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        tokens.push(result.ok()?);
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_expr() {
        let tokens = tokenize("pi/4").unwrap();
        assert_eq!(tokens, vec![Token::Pi, Token::Slash, Token::Number(4.0)]);
    }

    #[test]
    fn test_tokenize_identifier_list() {
        let tokens = tokenize("theta, phi").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("theta".into()),
                Token::Comma,
                Token::Identifier("phi".into()),
            ]
        );
    }
}

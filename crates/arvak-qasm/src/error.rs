//! Structured parse errors for the preprocessor and assertion grammar.

use thiserror::Error;

/// A source location expressed as 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// A parsing failure raised by the preprocessor or the assertion grammar.
///
/// Carries a structured location so front ends can underline the offending
/// token without re-scanning the source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {detail}")]
pub struct ParsingError {
    pub line: usize,
    pub column: usize,
    pub detail: String,
}

impl ParsingError {
    pub fn new(location: SourceLocation, detail: impl Into<String>) -> Self {
        Self {
            line: location.line,
            column: location.column,
            detail: detail.into(),
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParsingError>;

/// Translate a byte offset into a source string to a 1-based line/column pair.
#[must_use]
pub fn locate(source: &str, offset: usize) -> SourceLocation {
    let mut line = 1;
    let mut column = 1;
    for ch in source[..offset.min(source.len())].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    SourceLocation { line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_line() {
        let loc = locate("abc", 2);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 3);
    }

    #[test]
    fn test_locate_after_newline() {
        let loc = locate("ab\ncd", 4);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 2);
    }

    #[test]
    fn test_display_format() {
        let err = ParsingError::new(SourceLocation { line: 3, column: 5 }, "bad token");
        assert_eq!(err.to_string(), "3:5: bad token");
    }
}

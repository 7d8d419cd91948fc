//! Assertion grammar: `assert-ent`, `assert-sup`, `assert-eq`, `assert-ineq`
//! (spec §4).
//!
//! Grammar (after the leading `assert-<kind>` keyword is consumed):
//! ```text
//! assert-ent   target { "," target } [ "~" number ]
//! assert-sup   target { "," target } [ "~" number ]
//! assert-eq    target { "," target } "{" amplitude { "," amplitude } "}" [ "~" number ]
//! assert-ineq  target { "," target } "{" amplitude { "," amplitude } "}" [ "~" number ]
//! amplitude    := number | number "+" number "i" | number "-" number "i"
//! ```
//!
//! Validation (spec §4.2) rejects fewer targets than the kind requires
//! (entanglement needs at least two, to have a bipartition at all),
//! duplicate targets, a malformed body, and a non-positive tolerance.

use std::collections::BTreeSet;

use num_complex::Complex64;

use crate::error::{locate, ParseResult, ParsingError, SourceLocation};
use crate::program::Target;

/// Tolerance used when an assertion's `~ <number>` suffix is omitted.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Which assertion grammar production matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    Entanglement,
    Superposition,
    Equality,
    Inequality,
}

impl AssertionKind {
    /// Parse the `assert-<kind>` keyword, without its targets.
    pub fn from_keyword(keyword: &str) -> Option<AssertionKind> {
        match keyword {
            "assert-ent" => Some(AssertionKind::Entanglement),
            "assert-sup" => Some(AssertionKind::Superposition),
            "assert-eq" => Some(AssertionKind::Equality),
            "assert-ineq" => Some(AssertionKind::Inequality),
            _ => None,
        }
    }

    /// Whether this kind carries an expected-amplitude body (`{ ... }`).
    pub fn has_amplitudes(self) -> bool {
        matches!(self, AssertionKind::Equality | AssertionKind::Inequality)
    }
}

/// A fully parsed assertion, unfolded so every register-wide target has been
/// expanded to its indexed qubits (spec §4, "register-wide targets").
#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    pub kind: AssertionKind,
    pub targets: Vec<Target>,
    pub amplitudes: Vec<Complex64>,
    /// Comparison tolerance, `~ <number>` in the grammar. Defaults to
    /// [`DEFAULT_TOLERANCE`] when the assertion omits it.
    pub tolerance: f64,
}

/// Parse one assertion fragment, e.g. `assert-eq q[0], q[1] { 0.707, 0.707 }`.
///
/// `source` is the whole processed source and `offset` is the byte offset of
/// the start of `fragment` within it, used only to produce accurate error
/// locations.
pub fn parse_assertion(fragment: &str, source: &str, offset: usize) -> ParseResult<Assertion> {
    let loc = |rel: usize| locate(source, offset + rel);
    let trimmed = fragment.trim_end_matches(';').trim();

    let (keyword, rest) = split_keyword(trimmed);
    let kind = AssertionKind::from_keyword(keyword).ok_or_else(|| {
        ParsingError::new(loc(0), format!("unknown assertion keyword '{keyword}'"))
    })?;

    let (targets_part, body_part, tolerance_text) = if kind.has_amplitudes() {
        let open = rest.find('{').ok_or_else(|| {
            ParsingError::new(loc(keyword.len()), "expected '{' opening amplitude list")
        })?;
        let close = rest.rfind('}').ok_or_else(|| {
            ParsingError::new(loc(keyword.len()), "expected '}' closing amplitude list")
        })?;
        if close < open {
            return Err(ParsingError::new(loc(keyword.len()), "mismatched braces"));
        }
        let (_, tolerance_text) = split_tolerance(&rest[close + 1..]);
        (&rest[..open], Some(&rest[open + 1..close]), tolerance_text)
    } else {
        let (targets_part, tolerance_text) = split_tolerance(rest);
        (targets_part, None, tolerance_text)
    };

    let targets = parse_targets(targets_part, &loc, keyword.len())?;
    if targets.is_empty() {
        return Err(ParsingError::new(
            loc(keyword.len()),
            "assertion requires at least one target",
        ));
    }
    if kind == AssertionKind::Entanglement && targets.len() < 2 {
        return Err(ParsingError::new(
            loc(keyword.len()),
            "assert-ent requires at least two targets to form a bipartition",
        ));
    }

    let mut seen = BTreeSet::new();
    for target in &targets {
        if !seen.insert(target.clone()) {
            return Err(ParsingError::new(
                loc(keyword.len()),
                format!("duplicate assertion target '{target}'"),
            ));
        }
    }

    let amplitudes = match body_part {
        Some(body) => parse_amplitudes(body, &loc, keyword.len())?,
        None => Vec::new(),
    };

    if kind.has_amplitudes() && amplitudes.len() != targets.len() {
        return Err(ParsingError::new(
            loc(keyword.len()),
            format!(
                "expected {} amplitude(s) for {} target(s), got {}",
                targets.len(),
                targets.len(),
                amplitudes.len()
            ),
        ));
    }

    let tolerance = match tolerance_text.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => {
            let value: f64 = text
                .parse()
                .map_err(|_| ParsingError::new(loc(keyword.len()), format!("invalid tolerance '{text}'")))?;
            if value <= 0.0 {
                return Err(ParsingError::new(loc(keyword.len()), "assertion tolerance must be greater than zero"));
            }
            value
        }
        None => DEFAULT_TOLERANCE,
    };

    Ok(Assertion { kind, targets, amplitudes, tolerance })
}

/// Split off an optional trailing `~ <tolerance>` clause.
fn split_tolerance(s: &str) -> (&str, Option<&str>) {
    match s.find('~') {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    }
}

fn split_keyword(trimmed: &str) -> (&str, &str) {
    match trimmed.find(char::is_whitespace) {
        Some(idx) => (&trimmed[..idx], trimmed[idx..].trim_start()),
        None => (trimmed, ""),
    }
}

fn parse_targets(
    part: &str,
    loc: &impl Fn(usize) -> SourceLocation,
    base: usize,
) -> ParseResult<Vec<Target>> {
    part.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|tok| {
            Target::parse(tok)
                .ok_or_else(|| ParsingError::new(loc(base), format!("invalid target '{tok}'")))
        })
        .collect()
}

fn parse_amplitudes(
    body: &str,
    loc: &impl Fn(usize) -> SourceLocation,
    base: usize,
) -> ParseResult<Vec<Complex64>> {
    body.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|tok| parse_amplitude(tok).ok_or_else(|| {
            ParsingError::new(loc(base), format!("invalid amplitude '{tok}'"))
        }))
        .collect()
}

fn parse_amplitude(token: &str) -> Option<Complex64> {
    let token = token.trim();
    if let Some(imag) = token.strip_suffix('i') {
        let imag = imag.trim();
        if let Some(split) = find_sign_split(imag) {
            let (re, im) = imag.split_at(split);
            let re: f64 = re.trim().parse().ok()?;
            let im: f64 = im.trim().parse().ok()?;
            return Some(Complex64::new(re, im));
        }
        let im: f64 = if imag.is_empty() { 1.0 } else { imag.parse().ok()? };
        return Some(Complex64::new(0.0, im));
    }
    token.parse::<f64>().ok().map(|re| Complex64::new(re, 0.0))
}

/// Index of the `+`/`-` that separates the real and imaginary parts of
/// `a+bi`/`a-bi`, skipping a leading sign and any exponent sign.
fn find_sign_split(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    for i in (1..bytes.len()).rev() {
        let c = bytes[i];
        if (c == b'+' || c == b'-') && bytes[i - 1] != b'e' && bytes[i - 1] != b'E' {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assert_sup() {
        let a = parse_assertion("assert-sup q[0];", "assert-sup q[0];", 0).unwrap();
        assert_eq!(a.kind, AssertionKind::Superposition);
        assert_eq!(a.targets, vec![Target::Indexed("q".into(), 0)]);
        assert!(a.amplitudes.is_empty());
    }

    #[test]
    fn test_parse_assert_ent_multiple_targets() {
        let a = parse_assertion("assert-ent q[0], q[1];", "assert-ent q[0], q[1];", 0).unwrap();
        assert_eq!(a.kind, AssertionKind::Entanglement);
        assert_eq!(a.targets.len(), 2);
    }

    #[test]
    fn test_parse_assert_eq_with_amplitudes() {
        let src = "assert-eq q[0] { 0.707 };";
        let a = parse_assertion(src, src, 0).unwrap();
        assert_eq!(a.kind, AssertionKind::Equality);
        assert_eq!(a.amplitudes.len(), 1);
        assert!((a.amplitudes[0].re - 0.707).abs() < 1e-9);
    }

    #[test]
    fn test_parse_assert_eq_complex_amplitude() {
        let src = "assert-eq q[0] { 0.5+0.5i };";
        let a = parse_assertion(src, src, 0).unwrap();
        assert!((a.amplitudes[0].re - 0.5).abs() < 1e-9);
        assert!((a.amplitudes[0].im - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_assert_eq_mismatched_counts_errors() {
        let src = "assert-eq q[0], q[1] { 0.707 };";
        let err = parse_assertion(src, src, 0).unwrap_err();
        assert!(err.detail.contains("amplitude"));
    }

    #[test]
    fn test_parse_unknown_keyword_errors() {
        let src = "assert-foo q[0];";
        assert!(parse_assertion(src, src, 0).is_err());
    }

    #[test]
    fn test_parse_missing_brace_errors() {
        let src = "assert-eq q[0] 0.707 ;";
        assert!(parse_assertion(src, src, 0).is_err());
    }

    #[test]
    fn test_parse_assert_ent_single_target_errors() {
        let src = "assert-ent q[0];";
        let err = parse_assertion(src, src, 0).unwrap_err();
        assert!(err.detail.contains("bipartition"));
    }

    #[test]
    fn test_parse_duplicate_targets_errors() {
        let src = "assert-ent q[0], q[0];";
        let err = parse_assertion(src, src, 0).unwrap_err();
        assert!(err.detail.contains("duplicate"));
    }

    #[test]
    fn test_parse_duplicate_targets_errors_for_superposition() {
        let src = "assert-sup q[0], q[0];";
        let err = parse_assertion(src, src, 0).unwrap_err();
        assert!(err.detail.contains("duplicate"));
    }

    #[test]
    fn test_parse_default_tolerance() {
        let src = "assert-sup q[0];";
        let a = parse_assertion(src, src, 0).unwrap();
        assert!((a.tolerance - DEFAULT_TOLERANCE).abs() < 1e-12);
    }

    #[test]
    fn test_parse_explicit_tolerance() {
        let src = "assert-ent q[0], q[1] ~ 0.01;";
        let a = parse_assertion(src, src, 0).unwrap();
        assert!((a.tolerance - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_parse_non_positive_tolerance_errors() {
        let src = "assert-ent q[0], q[1] ~ 0;";
        let err = parse_assertion(src, src, 0).unwrap_err();
        assert!(err.detail.contains("tolerance"));
    }

    #[test]
    fn test_parse_tolerance_with_amplitude_body() {
        let src = "assert-eq q[0] { 0.707 } ~ 0.02;";
        let a = parse_assertion(src, src, 0).unwrap();
        assert!((a.tolerance - 0.02).abs() < 1e-12);
        assert_eq!(a.amplitudes.len(), 1);
    }
}

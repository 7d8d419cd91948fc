//! `load_code_with_result` return type (spec §6).

/// Outcome of attempting to load source without raising on parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub ok: bool,
    pub error_line: Option<usize>,
    pub error_column: Option<usize>,
    pub detail: Option<String>,
}

impl LoadResult {
    pub fn success() -> Self {
        Self { ok: true, error_line: None, error_column: None, detail: None }
    }

    pub fn failure(error: &arvak_qasm::ParsingError) -> Self {
        Self {
            ok: false,
            error_line: Some(error.line),
            error_column: Some(error.column),
            detail: Some(error.detail.clone()),
        }
    }
}

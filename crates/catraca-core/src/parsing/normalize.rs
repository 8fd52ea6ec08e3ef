use deunicode::deunicode;

use crate::rules::{
    LINE_CODE_WIDTH, MAINTENANCE_CANONICAL_CODE, MAINTENANCE_TYPO_FRAGMENT, NOT_INFORMED_COMPANY,
};

/// Canonicalize categorical text: trim, strip diacritics, uppercase.
/// Empty or absent text becomes the "not informed" placeholder, so the
/// same missing-operator rows always land on one aggregation key.
pub fn canonicalize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NOT_INFORMED_COMPANY.to_string();
    }
    deunicode(trimmed).trim().to_uppercase()
}

/// Normalize a raw line code to its canonical form.
///
/// The extracts carry three quirks: a leading fleet prefix "A"
/// ("A501"), decimal sub-line suffixes ("501.2"), and unpadded numeric
/// codes ("7" for line 007). A code containing the garbled maintenance
/// spelling is rewritten to the canonical maintenance code.
pub fn normalize_line_code(raw: &str) -> String {
    let mut code = raw.trim().to_string();

    if code.starts_with('A') && code.chars().count() > 1 {
        code.remove(0);
    }
    if let Some(idx) = code.find('.') {
        code.truncate(idx);
    }
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        code = format!("{:0>width$}", code, width = LINE_CODE_WIDTH);
    }
    if code.contains(MAINTENANCE_TYPO_FRAGMENT) {
        return MAINTENANCE_CANONICAL_CODE.to_string();
    }
    code
}

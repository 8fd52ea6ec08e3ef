use crate::error::ImportError;
use crate::rules::{HeaderProfile, RoleKeywords};

/// Column indices resolved from the first line of a feed. Date and line
/// are mandatory; the remaining roles degrade to per-row defaults.
/// Derived once per import and immutable for the whole stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoleMap {
    pub date: usize,
    pub line: usize,
    pub name: Option<usize>,
    pub total: Option<usize>,
    pub company: Option<usize>,
}

/// Map raw header tokens to semantic roles using a feed profile.
///
/// Every token is normalized (trim + lowercase) and matched by
/// substring. The first column in original order wins for each role;
/// the total role retries with its fallback keyword set when the
/// primary set matches nothing.
pub fn resolve_columns(
    headers: &[String],
    profile: &HeaderProfile,
) -> Result<ColumnRoleMap, ImportError> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let date = find_role(&normalized, &profile.date);
    let line = find_role(&normalized, &profile.line);
    let (Some(date), Some(line)) = (date, line) else {
        return Err(ImportError::MissingColumns {
            found: headers.to_vec(),
        });
    };

    Ok(ColumnRoleMap {
        date,
        line,
        name: find_role(&normalized, &profile.name),
        total: find_role(&normalized, &profile.total),
        company: find_role(&normalized, &profile.company),
    })
}

fn find_role(normalized: &[String], keywords: &RoleKeywords) -> Option<usize> {
    find_keyword(normalized, keywords.primary).or_else(|| find_keyword(normalized, keywords.fallback))
}

fn find_keyword(normalized: &[String], keywords: &[&str]) -> Option<usize> {
    normalized
        .iter()
        .position(|header| keywords.iter().any(|keyword| header.contains(keyword)))
}

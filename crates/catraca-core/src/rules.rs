//! Domain policy held as data: header keyword profiles for the two
//! feed flavors, and the hard-coded corrections the upstream extracts
//! require. The matching logic lives in `parsing`; this module only
//! declares what to match.

/// Company recorded when a feed does not name an operator.
pub const NOT_INFORMED_COMPANY: &str = "NAO INFORMADA";

/// Line codes dropped from aggregation entirely. Counted in the import
/// summary as exclusions, not errors.
pub const EXCLUDED_LINE_CODES: &[&str] = &["900"];

/// Garbled spelling of the maintenance category seen in realized
/// extracts (bad encoding upstream).
pub const MAINTENANCE_TYPO_FRAGMENT: &str = "MANUTEN";

/// The maintenance-category code as the record store knows it. The
/// spelling is the upstream system's own, typo included.
pub const MAINTENANCE_CANONICAL_CODE: &str = "MNUTENÇÃO";

/// Positional columns (0-based, inclusive) summed by the predicted-feed
/// audit. Positional by upstream convention, not header-resolved.
pub const AUDIT_COMPONENT_COLUMNS: std::ops::RangeInclusive<usize> = 4..=15;

/// Width all-digit line codes are zero-padded to.
pub const LINE_CODE_WIDTH: usize = 3;

/// Maximum entries in the per-import date cache. When full, new dates
/// are still parsed, just not cached.
pub const DATE_CACHE_CAPACITY: usize = 10_000;

/// True when a canonical line code is dropped by domain rule.
pub fn is_excluded_line(code: &str) -> bool {
    EXCLUDED_LINE_CODES.contains(&code)
}

/// Keyword sets resolving one header role. Tokens are matched by
/// substring on the trimmed, lowercased header; `primary` is tried
/// across all columns before `fallback`.
#[derive(Debug, Clone, Copy)]
pub struct RoleKeywords {
    pub primary: &'static [&'static str],
    pub fallback: &'static [&'static str],
}

impl RoleKeywords {
    const fn plain(primary: &'static [&'static str]) -> Self {
        RoleKeywords {
            primary,
            fallback: &[],
        }
    }
}

/// Header-matching policy for one feed flavor.
#[derive(Debug, Clone, Copy)]
pub struct HeaderProfile {
    pub date: RoleKeywords,
    pub line: RoleKeywords,
    pub total: RoleKeywords,
    pub company: RoleKeywords,
    pub name: RoleKeywords,
}

const COMPANY_KEYWORDS: RoleKeywords =
    RoleKeywords::plain(&["empresa", "company", "operadora", "nome"]);

const NAME_KEYWORDS: RoleKeywords = RoleKeywords::plain(&[
    "nome",
    "denominacao",
    "denominação",
    "descric",
    "descriç",
]);

/// Realized extracts come out of a database tool; headers are terse.
pub const REALIZED_PROFILE: HeaderProfile = HeaderProfile {
    date: RoleKeywords::plain(&["datadebito", "data", "date", "dia", "periodo"]),
    line: RoleKeywords::plain(&["linha", "line", "cod"]),
    total: RoleKeywords {
        primary: &["total", "realizado", "sum", "soma"],
        fallback: &["passageiros", "qtd", "passengers", "val"],
    },
    company: COMPANY_KEYWORDS,
    name: NAME_KEYWORDS,
};

/// Predicted extracts are spreadsheet exports with wordier headers.
pub const PREDICTED_PROFILE: HeaderProfile = HeaderProfile {
    date: RoleKeywords::plain(&["período", "periodo", "data", "date", "dia", "dt_"]),
    line: RoleKeywords::plain(&["linha", "line", "cod", "servico", "serviço"]),
    total: RoleKeywords {
        primary: &["total", "previsto", "realizado", "sum", "soma"],
        fallback: &["passageiros", "scheduled", "passengers", "qtd", "val"],
    },
    company: COMPANY_KEYWORDS,
    name: NAME_KEYWORDS,
};

//! Keyword tables and the classification routine.

use super::{Classification, Rejection};

/// Keywords a statement is allowed to start with.
pub const ALLOWED_PREFIXES: &[&str] = &["SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "USE"];

/// Keywords whose presence anywhere in the text forces rejection.
///
/// Order matters: when several occur, the first one in this list is reported.
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "RENAME", "REPLACE",
    "GRANT", "REVOKE", "LOCK", "UNLOCK", "SET", "COMMIT", "ROLLBACK", "START", "LOAD", "IMPORT",
    "CALL", "EXECUTE", "PREPARE",
];

/// Read-only admission filter.
///
/// Stateless; a single instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmissionFilter;

impl AdmissionFilter {
    /// Creates a new admission filter.
    pub fn new() -> Self {
        Self
    }

    /// Classifies a query.
    ///
    /// The text is trimmed and uppercased for matching only; callers keep
    /// executing the original string. The deny-list scan covers the whole
    /// text, quoted literals and comments included, so a read-only query that
    /// mentions e.g. `'SET'` in a literal is still rejected.
    pub fn classify(&self, sql: &str) -> Classification {
        let normalized = sql.trim().to_uppercase();
        let forbidden = FORBIDDEN_KEYWORDS
            .iter()
            .find(|keyword| normalized.contains(*keyword))
            .copied();

        if !ALLOWED_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
        {
            return Classification::Rejected(Rejection::NotReadOnly { found: forbidden });
        }

        match forbidden {
            Some(keyword) => Classification::Rejected(Rejection::ForbiddenKeyword(keyword)),
            None => Classification::Allowed,
        }
    }
}

/// Convenience function to classify SQL without creating a filter instance.
pub fn classify_sql(sql: &str) -> Classification {
    AdmissionFilter::new().classify(sql)
}

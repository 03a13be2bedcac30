//! Query admission filter.
//!
//! Decides from the query text alone whether a statement may be executed,
//! enforcing a strict read-only policy. The check is lexical: a prefix
//! allow-list followed by a deny-list substring scan over the uppercased text.
//! It blocks accidental mutating statements; it is not a defence against
//! adversarial SQL.

mod filter;

pub use filter::{classify_sql, AdmissionFilter, ALLOWED_PREFIXES, FORBIDDEN_KEYWORDS};

use std::fmt;

/// Outcome of running a query through the admission filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The query may be executed.
    Allowed,
    /// The query must not reach the database.
    Rejected(Rejection),
}

impl Classification {
    /// Returns true if the query may be executed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the rejection reason, if any.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Allowed => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }

    /// Converts the classification into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Self::Allowed => Ok(()),
            Self::Rejected(reason) => Err(reason),
        }
    }
}

/// Why a query was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The statement does not start with an allow-listed keyword. `found`
    /// is the first deny-listed keyword in the text, if any.
    NotReadOnly { found: Option<&'static str> },
    /// The statement contains a deny-listed keyword somewhere in its text.
    ForbiddenKeyword(&'static str),
}

impl Rejection {
    /// The deny-listed keyword the statement contains, if any.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::NotReadOnly { found } => *found,
            Self::ForbiddenKeyword(kw) => Some(*kw),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReadOnly { found } => {
                write!(
                    f,
                    "only read-only statements are permitted ({})",
                    ALLOWED_PREFIXES.join(", ")
                )?;
                if let Some(kw) = found {
                    write!(f, "; statement contains forbidden keyword {kw}")?;
                }
                Ok(())
            }
            Self::ForbiddenKeyword(kw) => write!(f, "statement contains forbidden keyword {kw}"),
        }
    }
}

impl std::error::Error for Rejection {}

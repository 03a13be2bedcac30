//! Admission filter properties.
//!
//! Exercises the filter through the public API over generated inputs.

use db_sqltool::safety::{
    classify_sql, Classification, Rejection, ALLOWED_PREFIXES, FORBIDDEN_KEYWORDS,
};

/// Text fragments that contain no forbidden keyword, in any case.
const CLEAN_TAILS: &[&str] = &[
    " * FROM users",
    " id, name FROM customers WHERE id = 7",
    " TABLES",
    " orders",
    " DATABASES",
    " COUNT(*) FROM t GROUP BY status",
    "",
];

fn contains_forbidden(sql: &str) -> bool {
    let upper = sql.to_uppercase();
    FORBIDDEN_KEYWORDS.iter().any(|kw| upper.contains(kw))
}

#[test]
fn test_allowed_prefix_without_forbidden_words_is_allowed() {
    for prefix in ALLOWED_PREFIXES {
        for tail in CLEAN_TAILS {
            let sql = format!("{prefix}{tail}");
            assert!(!contains_forbidden(&sql), "fixture is not clean: {sql}");
            assert_eq!(classify_sql(&sql), Classification::Allowed, "{sql}");
            assert_eq!(
                classify_sql(&sql.to_lowercase()),
                Classification::Allowed,
                "{sql}"
            );
        }
    }
}

#[test]
fn test_other_prefixes_are_rejected() {
    for sql in [
        "WITH cte AS (SELECT 1) SELECT * FROM cte",
        "HANDLER t OPEN",
        "CHECKSUM TABLE t",
        "OPTIMIZE TABLE t",
        "KILL 42",
        "FLUSH TABLES",
        "  ",
    ] {
        assert_eq!(
            classify_sql(sql),
            Classification::Rejected(Rejection::NotReadOnly { found: None }),
            "{sql}"
        );
    }
}

#[test]
fn test_each_forbidden_keyword_is_named() {
    for (position, keyword) in FORBIDDEN_KEYWORDS.iter().enumerate() {
        let sql = format!("SELECT * FROM t WHERE note = '{keyword}'");
        // Later keywords may contain earlier ones (UNLOCK contains LOCK).
        let expected = FORBIDDEN_KEYWORDS[..=position]
            .iter()
            .find(|earlier| keyword.contains(*earlier))
            .copied()
            .unwrap_or(*keyword);

        assert_eq!(
            classify_sql(&sql),
            Classification::Rejected(Rejection::ForbiddenKeyword(expected)),
            "{sql}"
        );
    }
}

#[test]
fn test_documented_scenarios() {
    assert_eq!(classify_sql("SHOW TABLES"), Classification::Allowed);
    assert_eq!(
        classify_sql("DROP TABLE t"),
        Classification::Rejected(Rejection::NotReadOnly { found: Some("DROP") })
    );
    assert_eq!(
        classify_sql("DELETE FROM t WHERE id=1"),
        Classification::Rejected(Rejection::NotReadOnly { found: Some("DELETE") })
    );
    assert_eq!(
        classify_sql("SELECT * FROM t WHERE name = 'SET'"),
        Classification::Rejected(Rejection::ForbiddenKeyword("SET"))
    );
}

#[test]
fn test_read_only_prefix_with_mutation_names_keyword() {
    assert_eq!(
        classify_sql("SELECT 1; DROP TABLE t").rejection(),
        Some(Rejection::ForbiddenKeyword("DROP"))
    );
    assert_eq!(
        classify_sql("explain delete from t where id = 1").rejection(),
        Some(Rejection::ForbiddenKeyword("DELETE"))
    );
}

//! Static text shown by the shell.

use crate::config::ConnectionConfig;
use crate::safety::{Rejection, ALLOWED_PREFIXES, FORBIDDEN_KEYWORDS};

/// Prompt shown before each line of interactive input.
pub const PROMPT: &str = "SQL> ";

/// Message printed when the interactive session ends.
pub const FAREWELL: &str = "Bye!";

const RULE: &str =
    "================================================================================";

/// Help text displayed for the `help` command.
pub const HELP_TEXT: &str = r#"Help:
-----
1. Type a SQL statement and press Enter to run it
2. Only read-only statements are accepted
3. Type 'exit' or 'quit' to leave
4. Type 'help' to show this message

Allowed statements:
  SELECT    - Query data
  SHOW      - List databases, tables, columns and server information
  DESCRIBE  - Show a table's structure
  DESC      - Short form of DESCRIBE
  EXPLAIN   - Show a query's execution plan
  USE       - Switch the current database

Refused statements:
  INSERT, UPDATE, DELETE  - Data changes
  DROP, CREATE, ALTER     - Schema changes
  TRUNCATE, RENAME        - Table operations
  GRANT, REVOKE           - Privilege changes
  and any other statement that could modify data or session state

Note: the check is a plain keyword scan over the whole statement, so a
forbidden word anywhere in the text, even inside a string literal or a
column name such as created_at, causes a rejection.

Examples:
  SELECT * FROM table_name LIMIT 10;
  SHOW TABLES;
  SHOW DATABASES;
  DESCRIBE table_name;
  SELECT COUNT(*) FROM table_name WHERE status = 'active';
  USE database_name;"#;

/// Startup banner for interactive mode.
pub fn banner(config: &ConnectionConfig) -> String {
    format!(
        "{RULE}\n\
         sqltool - interactive mode (read-only)\n\
         {RULE}\n\
         Target: {}:{}\n\
         \n\
         Read-only policy:\n\
         {}\n\
         \n\
         Type 'exit' or 'quit' to leave, 'help' for help\n\
         {RULE}\n",
        config.host,
        config.port,
        policy_summary(),
    )
}

/// Message block printed when the admission filter rejects a query.
pub fn rejection_notice(reason: &Rejection) -> String {
    format!(
        "Rejected: {reason}\n\
         {RULE}\n\
         This tool only runs read-only queries.\n\
         {}\n\
         {RULE}",
        policy_summary()
    )
}

/// The allow and deny lists, as enforced.
fn policy_summary() -> String {
    format!(
        "  Allowed:   {}\n  Forbidden: {}",
        ALLOWED_PREFIXES.join(", "),
        FORBIDDEN_KEYWORDS.join(", ")
    )
}

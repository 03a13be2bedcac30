//! Recognition of interactive input lines.

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Blank line; nothing to do.
    Empty,
    /// `exit` or `quit`.
    Exit,
    /// `help`.
    Help,
    /// Anything else, to be classified and executed.
    Query(String),
}

impl InputCommand {
    /// Parses one line of input. Surrounding whitespace is ignored and the
    /// built-in commands are matched case-insensitively.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        match line.to_lowercase().as_str() {
            "exit" | "quit" => Self::Exit,
            "help" => Self::Help,
            _ => Self::Query(line.to_string()),
        }
    }
}

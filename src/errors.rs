use thiserror::Error;

/// All errors are fatal at their detection site; there is no recovery or
/// partial-compilation mode (see the error handling design notes).
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Syntax error: {0}")]
    Parse(#[from] pest::error::Error<crate::parser::Rule>),

    #[error("Syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("Unsupported form on line {line}: {reason}")]
    UnsupportedForm { line: usize, reason: String },

    #[error("Redefinition on line {line}: symbol already declared: {name}")]
    Redefinition { line: usize, name: String },

    #[error("Undeclared symbol on line {line}: {name}")]
    UndeclaredSymbol { line: usize, name: String },

    #[error("Bad data destination: {reason}")]
    BadDataDestination { reason: String },

    #[error("Bad control destination: {reason}")]
    BadControlDestination { reason: String },
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Wrong argument shape: invalid tags, mismatched tagged-template parts,
    /// or a value that cannot be converted into a scope.
    #[error("Type Error: {0}")]
    Type(String),
    #[error("Syntax Error: {message} in {input:?} at position {position}")]
    Syntax {
        message: String,
        input: String,
        position: usize,
    },
    #[error("Range Error: {what} is {actual}, exceeding the limit of {limit}")]
    Range {
        what: &'static str,
        limit: usize,
        actual: usize,
    },
    #[error("Reference Error: {key:?} is not defined in {path:?}")]
    Reference { key: String, path: String },
    #[error("Resolver Error: {0}")]
    Resolver(anyhow::Error),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>, input: &str, position: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            input: input.to_string(),
            position,
        }
    }

    pub(crate) fn range(what: &'static str, limit: usize, actual: usize) -> Self {
        Error::Range {
            what,
            limit,
            actual,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Type(msg.to_string())
    }
}

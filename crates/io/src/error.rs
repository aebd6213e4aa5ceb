use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// Input file could not be read.
    Read { path: String, message: String },
    /// CSV syntax error in the input.
    Csv(String),
    /// A configured column override names a column the input does not have.
    MissingColumn(String),
    /// The input already has a column with the output id column's name.
    DuplicateIdColumn(String),
    /// Output file could not be written.
    Write { path: String, message: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::MissingColumn(column) => write!(f, "missing column '{column}'"),
            Self::DuplicateIdColumn(column) => {
                write!(f, "input already has a column named '{column}'")
            }
            Self::Write { path, message } => write!(f, "cannot write {path}: {message}"),
        }
    }
}

impl std::error::Error for IoError {}

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// Match mode other than `email`, `phone` or `email_or_phone`.
    UnsupportedMatchMode(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty id column, empty input path, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMatchMode(mode) => write!(
                f,
                "unsupported match mode: \"{mode}\" (expected email, phone or email_or_phone)"
            ),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ClusterError {}

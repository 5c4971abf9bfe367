use thiserror::Error;

pub type MailforgeResult<T> = Result<T, MailforgeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MailforgeError {
    #[error("Parse error: {message} ({count} problem(s) reported)")]
    ParseError { message: String, count: usize },

    #[error("Empty document: the editor has no content")]
    EmptyDocument,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
}

impl MailforgeError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        MailforgeError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for MailforgeError {
    fn from(err: serde_yaml::Error) -> Self {
        MailforgeError::ConfigError(err.to_string())
    }
}

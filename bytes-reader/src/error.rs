use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("short read: {needed} more bytes needed")]
    ShortRead { needed: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("utf8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("constraint error: {0}")]
    Constraint(String),
}

impl Error {
    pub(crate) fn short(needed: usize) -> Self {
        Error::ShortRead { needed }
    }

    pub fn is_short_read(&self) -> bool {
        matches!(self, Error::ShortRead { .. })
    }
}

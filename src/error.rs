use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    /// The stream was empty before the first byte of the file.
    #[error("End of stream")]
    Eof,

    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("Invalid format: {0}")]
    Format(&'static str),

    #[error("Unsupported variant: {0}")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl DecodeError {
    /// Returns `true` for any end-of-input condition, clean or not.
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof | Self::UnexpectedEof)
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::Io(err),
        }
    }
}

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeError {
    BufferTooSmall { needed: usize, available: usize },
    DataTooLong(usize),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::BufferTooSmall { needed, available } => write!(
                f,
                "record needs {} bytes but the buffer holds {}",
                needed, available
            ),
            SerializeError::DataTooLong(length) => {
                write!(f, "{} data bytes do not fit in one record", length)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SerializeError {}

#[cfg(feature = "std")]
pub use self::encode::EncodeError;

#[cfg(feature = "std")]
mod encode {
    use super::SerializeError;
    use std::io;
    use std::path::PathBuf;
    use thiserror::Error;

    /// Errors that end an encode run.
    #[derive(Debug, Error)]
    pub enum EncodeError {
        #[error("unable to open {}: {source}", .path.display())]
        InputUnavailable {
            path: PathBuf,
            #[source]
            source: io::Error,
        },

        #[error("error on read: {0}")]
        Read(#[source] io::Error),

        #[error("error on write: {0}")]
        Write(#[source] io::Error),

        #[error("invalid record: {0}")]
        Record(#[from] SerializeError),

        #[error("invalid configuration: {0}")]
        InvalidConfig(&'static str),
    }
}

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdfError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("File is too short to contain a valid EDF/BDF header ({len} bytes, need {required})")]
    FileTooShort { len: usize, required: usize },

    #[error("Invalid EDF/BDF header: cannot parse {field} from {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("Invalid number of signals: {0:?}")]
    InvalidSignalCount(String),

    #[error("Invalid EDF/BDF header: cannot parse {field} for signal {signal} from {value:?}")]
    InvalidSignalField {
        signal: usize,
        field: &'static str,
        value: String,
    },

    #[error("Invalid channel ID: {0}")]
    InvalidChannel(usize),

    #[error("Read error: unexpected end of file in data record {record} (needs {end} bytes, file has {len})")]
    TruncatedRecord { record: usize, end: usize, len: usize },
}

impl EdfError {
    /// True for errors raised while parsing the header.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            EdfError::FileTooShort { .. }
                | EdfError::InvalidField { .. }
                | EdfError::InvalidSignalCount(_)
                | EdfError::InvalidSignalField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EdfError>;

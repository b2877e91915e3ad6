use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// An error that stops validation of a capture file before a report can be produced.
#[derive(Debug)]
pub enum ValidateError {
    /// The file does not exist at the given path
    NotFound(PathBuf),
    /// An I/O error
    Io(io::Error),
    /// A CSV parsing error (from the csv crate)
    Csv(csv::Error),
    /// The file contents are not valid UTF-8
    Encoding(String),
}

pub type Result<T> = ::std::result::Result<T, ValidateError>;

impl ValidateError {
    /// Returns `true` for every failure other than a missing file.
    pub fn is_unreadable(&self) -> bool {
        !matches!(*self, ValidateError::NotFound(_))
    }
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidateError::NotFound(ref path) => write!(f, "File not found: {}", path.display()),
            ValidateError::Io(ref err) => write!(f, "IO error: {}", err),
            ValidateError::Csv(ref err) => write!(f, "CSV read error: {}", err),
            ValidateError::Encoding(ref s) => write!(f, "Invalid UTF-8: {}", s),
        }
    }
}

impl Error for ValidateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ValidateError::Io(ref err) => Some(err),
            ValidateError::Csv(ref err) => Some(err),
            ValidateError::NotFound(_) | ValidateError::Encoding(_) => None,
        }
    }
}

impl From<io::Error> for ValidateError {
    fn from(err: io::Error) -> ValidateError {
        ValidateError::Io(err)
    }
}
impl From<csv::Error> for ValidateError {
    fn from(err: csv::Error) -> ValidateError {
        ValidateError::Csv(err)
    }
}
impl From<simdutf8::compat::Utf8Error> for ValidateError {
    fn from(err: simdutf8::compat::Utf8Error) -> ValidateError {
        ValidateError::Encoding(format!("invalid byte sequence at offset {}", err.valid_up_to()))
    }
}

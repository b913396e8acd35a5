//! The error taxonomy exposed at the facade boundary. Every filesystem or
//! parse failure inside the library is converted into one of these kinds;
//! no raw `std::io::Error` crosses the public API.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum LdpError {
    /// The stat or read target does not exist.
    NotFound { path: PathBuf },
    /// A filesystem failure other than absence.
    Io { path: PathBuf, message: String },
    /// The container's metadata resource holds malformed turtle.
    CannotParseContainer { path: PathBuf, message: String },
    /// The synthesized container graph could not be serialized to turtle.
    CannotSerializeContainer { message: String },
    /// A non-container RDF resource could not be parsed in the requested format.
    CannotParseResource { path: PathBuf, message: String },
    /// A caller-supplied slug contains reserved characters.
    BadSlug { slug: String },
    /// The slug allocator ran out of retry attempts.
    AllocationExhausted { slug: String, attempts: usize },
}

impl fmt::Display for LdpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LdpError::NotFound { path } => {
                write!(f, "Resource not found: {}", path.display())
            }
            LdpError::Io { path, message } => {
                write!(f, "I/O failure on {}: {}", path.display(), message)
            }
            LdpError::CannotParseContainer { path, message } => {
                write!(
                    f,
                    "Cannot parse container metadata {}: {}",
                    path.display(),
                    message
                )
            }
            LdpError::CannotSerializeContainer { message } => {
                write!(f, "Cannot serialize container graph: {}", message)
            }
            LdpError::CannotParseResource { path, message } => {
                write!(f, "Cannot parse resource {}: {}", path.display(), message)
            }
            LdpError::BadSlug { slug } => {
                write!(f, "Slug contains reserved characters: {:?}", slug)
            }
            LdpError::AllocationExhausted { slug, attempts } => {
                write!(
                    f,
                    "Could not allocate a free name for {:?} after {} attempts",
                    slug, attempts
                )
            }
        }
    }
}

impl std::error::Error for LdpError {}

impl LdpError {
    /// Maps an `std::io::Error` for `path` onto the taxonomy, distinguishing
    /// absence from other failures. A path that descends through a regular
    /// file (ENOTDIR) names a resource that does not exist, so it is absence
    /// too, not an I/O failure.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) {
            LdpError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LdpError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LdpError::NotFound { .. })
    }
}

//! Resource reading error types.

use std::fmt;
use std::path::PathBuf;

/// Error returned when a control file cannot be turned into a value.
#[derive(Debug)]
pub enum ResourceError {
    /// Control file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Control file content is not a valid number.
    Parse {
        path: PathBuf,
        value: String,
        message: String,
    },
}

impl ResourceError {
    /// Path of the control file involved.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ResourceError::Io { path, .. } | ResourceError::Parse { path, .. } => path,
        }
    }

    /// Check if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ResourceError::Parse { .. })
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ResourceError::Parse {
                path,
                value,
                message,
            } => {
                write!(
                    f,
                    "invalid value '{}' in {}: {}",
                    value,
                    path.display(),
                    message
                )
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Io { source, .. } => Some(source),
            ResourceError::Parse { .. } => None,
        }
    }
}

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A resolver reported a failure (as opposed to a missing value).
    #[error("failed to resolve secret '{name}': {message}")]
    Resolve { name: String, message: String },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("{} is {len} bytes, exceeds limit of {limit} bytes", path.display())]
    FileTooLarge { path: PathBuf, len: u64, limit: u64 },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_error_message() {
        let err = Error::Resolve {
            name: "certs-tls-crt".into(),
            message: "access denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to resolve secret 'certs-tls-crt': access denied"
        );
    }

    #[test]
    fn parse_error_includes_path() {
        let err = Error::parse("spec.yaml", "unexpected token");
        assert_eq!(err.to_string(), "failed to parse spec.yaml: unexpected token");
    }

    #[test]
    fn file_too_large_message() {
        let err = Error::FileTooLarge {
            path: "store.json".into(),
            len: 2048,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "store.json is 2048 bytes, exceeds limit of 1024 bytes"
        );
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Dead-reckoning pipeline error types
#[derive(Error, Debug)]
pub enum DeadReckoningError {
    #[error("Record source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error on line {line} ({content:?}): {reason}")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Series mismatch: {0}")]
    SeriesMismatch(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl DeadReckoningError {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn parse(line: usize, content: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeadReckoningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line_and_content() {
        let err = DeadReckoningError::parse(7, "1,abc,0,0,0", "field 2 is not an integer");
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("1,abc,0,0,0"));
        assert!(msg.contains("field 2"));
    }

    #[test]
    fn test_source_unavailable_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = DeadReckoningError::source_unavailable("/nope/log.txt", io);
        assert!(err.to_string().contains("/nope/log.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

use thiserror::Error;

/// Failure to turn serialized input into a [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum LoadError {
    /// Malformed JSON, or JSON that does not describe a document (unknown
    /// element kinds, missing required fields, wrong value types).
    #[error("document JSON error at {line}:{col}: {message}")]
    Json {
        message: String,
        /// 1-based source line number where the error occurred.
        line: usize,
        /// 1-based source column number where the error occurred.
        col: usize,
    },

    #[error("I/O error reading document: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return LoadError::Io(err.into());
        }
        LoadError::Json {
            message: err.to_string(),
            line: err.line(),
            col: err.column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_keeps_position() {
        let err: LoadError = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }")
            .unwrap_err()
            .into();
        match err {
            LoadError::Json { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Json error, got {other:?}"),
        }
    }

    #[test]
    fn display_mentions_position() {
        let err = LoadError::Json { message: "bad".into(), line: 3, col: 7 };
        assert_eq!(err.to_string(), "document JSON error at 3:7: bad");
    }
}

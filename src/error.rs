//! Application error type.
//!
//! Every fallible operation in the crate returns `AppError`: a message for the
//! user plus the process exit code the binary should terminate with.
//!
//! Exit codes:
//! - `2`: input/output problems (missing file, unsupported format, write failure)
//! - `3`: an import produced no usable points
//! - `4`: terminal/UI failures

use std::path::Path;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// No registered parser handles the file's extension.
    pub fn unsupported_format(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_else(|| "(none)".to_string());
        Self::new(
            2,
            format!(
                "Unsupported point file format {ext}: {} (expected .txt or .csv)",
                path.display()
            ),
        )
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_extension() {
        let err = AppError::unsupported_format(Path::new("data/points.xlsx"));
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains(".xlsx"), "{err}");

        let err = AppError::unsupported_format(Path::new("points"));
        assert!(err.message().contains("(none)"), "{err}");
    }
}

//! Application error type shared by every pipeline stage.
//!
//! Errors carry a coarse kind (mapped to a process exit code) plus a
//! human-readable message. There is deliberately no retry or recovery
//! machinery: any error aborts the remaining stages and surfaces a single
//! message on stderr.

/// Coarse error classification for the forecast pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad flags or configuration values.
    Usage,
    /// File read/write failure (exports, saved forecasts).
    Io,
    /// Provider response malformed or empty.
    Data,
    /// Historical series shorter than window width + 1.
    InsufficientData,
    /// Normalization denominator is zero (constant series).
    NumericDegeneracy,
    /// Training failed (non-finite loss, empty training split).
    Training,
    /// Terminal/TUI setup or draw failure.
    Terminal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage | ErrorKind::Io => 2,
            ErrorKind::InsufficientData => 3,
            ErrorKind::Data
            | ErrorKind::NumericDegeneracy
            | ErrorKind::Training
            | ErrorKind::Terminal => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientData, message)
    }

    pub fn numeric_degeneracy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NumericDegeneracy, message)
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Training, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
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
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::usage("x").exit_code(), 2);
        assert_eq!(AppError::insufficient_data("x").exit_code(), 3);
        assert_eq!(AppError::data("x").exit_code(), 4);
        assert_eq!(AppError::numeric_degeneracy("x").exit_code(), 4);
        assert_eq!(AppError::training("x").exit_code(), 4);
    }
}

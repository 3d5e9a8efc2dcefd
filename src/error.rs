use serde::Serialize;
use std::fmt;

/// Status code carried by a [`Status`]. Only the codes the dependency
/// manager produces or forwards are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Code {
    Unavailable,
    NotFound,
    Internal,
    Unknown,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Unavailable => write!(f, "UNAVAILABLE"),
            Code::NotFound => write!(f, "NOT_FOUND"),
            Code::Internal => write!(f, "INTERNAL"),
            Code::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// An error status, either received from the control plane or synthesized
/// by the reconciler (missing virtual host, cluster does not exist).
///
/// Statuses are values: they are stored per cluster in the emitted snapshot
/// and compared in tests, so the type is `Clone + PartialEq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Code::Unknown, message)
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Status {}

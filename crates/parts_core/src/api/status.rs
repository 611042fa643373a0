//! Caller-facing error taxonomy.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Status codes a part service call can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    /// Requested API version is not the one this service implements.
    Unimplemented,
    /// Update/Delete target is absent or already deleted.
    NotFound,
    /// Storage, conversion, or any other failure.
    Unknown,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unimplemented => "unimplemented",
            Self::NotFound => "not_found",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failed call outcome: a code plus a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(Code::Unimplemented, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
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

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl Error for Status {}

#[cfg(test)]
mod tests {
    use super::{Code, Status};

    #[test]
    fn display_prefixes_code() {
        let status = Status::not_found("Part with ID='7' is not found");
        assert_eq!(status.to_string(), "not_found: Part with ID='7' is not found");
    }

    #[test]
    fn serializes_code_in_snake_case() {
        let status = Status::unimplemented("nope");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["code"], "unimplemented");
        assert_eq!(json["message"], "nope");
        assert_eq!(Code::Unknown.as_str(), "unknown");
    }
}

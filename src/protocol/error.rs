//! Validation error types

use std::fmt;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// A required field is absent.
    Required,
    /// The field is not declared for this tool.
    UnknownField,
    /// The value has the wrong JSON type or cannot be coerced.
    Type,
    /// The value does not match the expected textual format (dates, emails).
    Format,
    /// The value is not a member of the declared set.
    Enum,
    /// The value is outside its numeric bounds, or a start/end pair is inverted.
    Range,
    /// A cross-field rule made this field required.
    ConditionallyRequired,
    /// A filter expression is not well-formed.
    Malformed,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::UnknownField => "unknown_field",
            Self::Type => "type",
            Self::Format => "format",
            Self::Enum => "enum",
            Self::Range => "range",
            Self::ConditionallyRequired => "conditionally_required",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field '{field}' ({reason}): {message}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
    /// Human-readable description of the expected constraint.
    pub message: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        reason: ValidationReason,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            reason,
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, ValidationReason::Required, "field is required")
    }

    pub fn unknown_field(field: &str, tool: &str) -> Self {
        Self::new(
            field,
            ValidationReason::UnknownField,
            format!("'{}' is not a parameter of {}", field, tool),
        )
    }
}

//! Shared error type across cspforge crates.

use thiserror::Error;

/// Stable error codes (safe to log and to match on in tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Directive name outside the CSP 1.0 catalog.
    InvalidDirectiveName,
    /// `sandbox` token outside the allowed set.
    InvalidSandboxKeyword,
    /// Source value that is neither a keyword nor a host expression.
    InvalidSourceValue,
    /// `report-uri` value failing the URI/path grammar.
    InvalidReportUri,
    /// `'none'` combined with other values.
    ConflictingNoneValue,
    /// `*` combined with other values.
    ConflictingWildcardValue,
    /// Unknown policy role.
    InvalidPolicyKind,
    /// Serialization requested before validation.
    Unvalidated,
    /// Startup configuration rejected.
    Config,
}

impl ErrorKind {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidDirectiveName => "INVALID_DIRECTIVE_NAME",
            ErrorKind::InvalidSandboxKeyword => "INVALID_SANDBOX_KEYWORD",
            ErrorKind::InvalidSourceValue => "INVALID_SOURCE_VALUE",
            ErrorKind::InvalidReportUri => "INVALID_REPORT_URI",
            ErrorKind::ConflictingNoneValue => "CONFLICTING_NONE_VALUE",
            ErrorKind::ConflictingWildcardValue => "CONFLICTING_WILDCARD_VALUE",
            ErrorKind::InvalidPolicyKind => "INVALID_POLICY_KIND",
            ErrorKind::Unvalidated => "UNVALIDATED_POLICY",
            ErrorKind::Config => "INVALID_CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CspError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CspError {
    #[error("'{directive}' is an invalid CSP 1.0 directive")]
    InvalidDirectiveName { directive: String },
    #[error("'{value}' is an invalid CSP 1.0 'sandbox' keyword")]
    InvalidSandboxKeyword { value: String },
    #[error("'{value}' is an invalid CSP 1.0 '{directive}' value")]
    InvalidSourceValue { directive: String, value: String },
    #[error("'{value}' is an invalid 'report-uri' value, must be of type RFC 3986")]
    InvalidReportUri { value: String },
    #[error("'none' denies all for '{directive}' directive, but exceptions are set")]
    ConflictingNoneValue { directive: String },
    #[error("'*' allows all for '{directive}' directive, but exceptions are set")]
    ConflictingWildcardValue { directive: String },
    #[error("'{kind}' is not a valid policy kind for '{operation}'")]
    InvalidPolicyKind { kind: String, operation: &'static str },
    #[error("policy must be parsed before it is serialized")]
    Unvalidated,
    #[error("invalid config: {0}")]
    Config(String),
}

impl CspError {
    /// Map the error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CspError::InvalidDirectiveName { .. } => ErrorKind::InvalidDirectiveName,
            CspError::InvalidSandboxKeyword { .. } => ErrorKind::InvalidSandboxKeyword,
            CspError::InvalidSourceValue { .. } => ErrorKind::InvalidSourceValue,
            CspError::InvalidReportUri { .. } => ErrorKind::InvalidReportUri,
            CspError::ConflictingNoneValue { .. } => ErrorKind::ConflictingNoneValue,
            CspError::ConflictingWildcardValue { .. } => ErrorKind::ConflictingWildcardValue,
            CspError::InvalidPolicyKind { .. } => ErrorKind::InvalidPolicyKind,
            CspError::Unvalidated => ErrorKind::Unvalidated,
            CspError::Config(_) => ErrorKind::Config,
        }
    }
}

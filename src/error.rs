//! Error types and result definitions for the xtend-tuya crate.
//! Covers the fallible edges: configuration loading and type information parsing.
//! The value decode path itself never returns an error.

use thiserror::Error;

/// Represents all possible errors raised while loading or interpreting DP metadata.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DpError {
    /// JSON serialization or deserialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// The status range names a type this crate does not know
    #[error("Unknown DP type '{0}'")]
    UnknownDpType(String),

    /// The DP code exists but carries a different value type
    #[error("DP code '{code}' is {found}, expected {expected}")]
    WrongDpType {
        code: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The device does not describe the requested DP code
    #[error("DP code '{0}' not found in status range")]
    DpCodeNotFound(String),

    /// The type information is present but unusable (e.g. missing "max")
    #[error("Invalid type information for '{code}': {reason}")]
    InvalidTypeInformation { code: String, reason: String },

    /// Entity platform name is not one of the supported platforms
    #[error("Unknown platform '{0}'")]
    UnknownPlatform(String),
}

/// A specialized Result type for DP operations.
pub type Result<T> = std::result::Result<T, DpError>;

impl From<serde_json::Error> for DpError {
    fn from(err: serde_json::Error) -> Self {
        DpError::Json(err.to_string())
    }
}

impl DpError {
    pub fn code(&self) -> u32 {
        match self {
            DpError::Json(_) => ERR_JSON,
            DpError::UnknownDpType(_) => ERR_DP_TYPE,
            DpError::WrongDpType { .. } => ERR_WRONG_DP_TYPE,
            DpError::DpCodeNotFound(_) => ERR_DP_CODE,
            DpError::InvalidTypeInformation { .. } => ERR_TYPE_INFO,
            DpError::UnknownPlatform(_) => ERR_PLATFORM,
        }
    }

    /// Human readable description of [`code`](Self::code).
    pub fn message(&self) -> &'static str {
        get_error_message(self.code())
    }
}

// Configuration and metadata error codes
define_error_codes! {
    ERR_JSON = 900 => "Invalid device or descriptor JSON",
    ERR_DP_TYPE = 901 => "Unknown DP type in status range",
    ERR_DP_CODE = 902 => "DP code not described by device",
    ERR_WRONG_DP_TYPE = 903 => "DP code has a different type",
    ERR_TYPE_INFO = 904 => "Invalid DP type information",
    ERR_PLATFORM = 905 => "Unknown entity platform",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let err = DpError::DpCodeNotFound("fault".into());
        assert_eq!(err.code(), ERR_DP_CODE);
        assert_eq!(err.message(), "DP code not described by device");
        assert_eq!(get_error_message(12345), "Unknown Error");

        let err = DpError::WrongDpType {
            code: "fault".into(),
            expected: "Boolean",
            found: "Bitmap",
        };
        assert_eq!(err.code(), ERR_WRONG_DP_TYPE);
        assert_eq!(DpError::UnknownDpType("Float".into()).code(), ERR_DP_TYPE);
        assert_eq!(
            DpError::UnknownPlatform("light".into()).message(),
            "Unknown entity platform"
        );
        assert_eq!(
            DpError::InvalidTypeInformation {
                code: "temp_set".into(),
                reason: "missing 'max'".into(),
            }
            .code(),
            ERR_TYPE_INFO
        );
    }

    #[test]
    fn test_from_serde_json() {
        let err: DpError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, DpError::Json(_)));
        assert_eq!(err.code(), ERR_JSON);
        assert_eq!(err.message(), "Invalid device or descriptor JSON");
    }
}

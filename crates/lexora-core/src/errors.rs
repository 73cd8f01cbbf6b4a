//! Backend error taxonomy
//!
//! Every failed backend response is classified into exactly one variant of
//! [`ApiError`]; the engine's recovery policy keys off the variant, never
//! off raw status codes or message text:
//!
//! | Variant | Policy |
//! |---|---|
//! | `AuthExpired` | global forced logout |
//! | `AuthorizationDenied` | local capability downgrade, not fatal |
//! | `Validation` | field-level feedback, no retry |
//! | `NotFound` / `Conflict` | user-visible message, prior state kept |
//! | `ServerFault` | "try again later", prior state kept |
//! | `Transport` | "try again later", prior state kept |
//!
//! No class carries automatic retry; every operation is human-triggered.

use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field's name
    pub field: String,
    /// Backend-provided message for that field
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Classified backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ApiError {
    /// The bearer token is no longer valid; the session must end.
    #[error("authentication expired")]
    AuthExpired,

    /// The backend refused this specific resource for this session.
    #[error("authorization denied for {resource}")]
    AuthorizationDenied {
        /// The resource kind the denial applies to
        resource: ResourceKind,
    },

    /// User-correctable input problems.
    #[error("validation failed ({} field(s))", fields.len())]
    Validation {
        /// Field-level messages for form feedback
        fields: Vec<FieldError>,
    },

    /// The addressed record does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Backend-provided description
        message: String,
    },

    /// The write conflicts with current backend state.
    #[error("conflict: {message}")]
    Conflict {
        /// Backend-provided description
        message: String,
    },

    /// The backend failed internally.
    #[error("server fault: {message}")]
    ServerFault {
        /// Backend-provided description
        message: String,
    },

    /// The request never produced a classified response.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },
}

impl ApiError {
    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a server fault
    pub fn server_fault(message: impl Into<String>) -> Self {
        Self::ServerFault {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an authorization denial for one resource kind
    pub fn denied(resource: ResourceKind) -> Self {
        Self::AuthorizationDenied { resource }
    }

    /// Create a single-field validation error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            fields: vec![FieldError::new(field, message)],
        }
    }

    /// Classify an HTTP status code for a request against the given
    /// resource kind.
    ///
    /// 401 always means the token died, regardless of which subsystem
    /// issued the call; 403 is a per-resource denial, never a logout.
    pub fn classify_status(status: u16, resource: ResourceKind, body: impl Into<String>) -> Self {
        match status {
            401 => Self::AuthExpired,
            403 => Self::AuthorizationDenied { resource },
            404 => Self::not_found(body),
            409 => Self::conflict(body),
            422 => Self::Validation { fields: Vec::new() },
            500..=599 => Self::server_fault(body),
            _ => Self::transport(format!("unexpected status {status}")),
        }
    }

    /// Whether this failure must end the whole session.
    pub fn forces_logout(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Whether this failure downgrades a capability instead of surfacing as
    /// a fatal error.
    pub fn downgrades_capability(&self) -> bool {
        matches!(self, Self::AuthorizationDenied { .. })
    }

    /// Whether prior local state should be kept when this failure arrives.
    ///
    /// Everything except an expired session keeps what the user already
    /// has on screen.
    pub fn keeps_prior_state(&self) -> bool {
        !self.forces_logout()
    }

    /// Whether the user can correct the failure by fixing input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Short stable code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthExpired => "AUTH_EXPIRED",
            Self::AuthorizationDenied { .. } => "AUTHZ_DENIED",
            Self::Validation { .. } => "VALIDATION",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ServerFault { .. } => "SERVER_FAULT",
            Self::Transport { .. } => "TRANSPORT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_classify_401_is_expiry_for_every_kind() {
        for kind in ResourceKind::ALL {
            let err = ApiError::classify_status(401, kind, "");
            assert_matches!(err, ApiError::AuthExpired);
            assert!(err.forces_logout());
        }
    }

    #[test]
    fn test_classify_403_is_local_denial() {
        let err = ApiError::classify_status(403, ResourceKind::FinancialRecords, "");
        assert_matches!(
            err,
            ApiError::AuthorizationDenied {
                resource: ResourceKind::FinancialRecords
            }
        );
        assert!(err.downgrades_capability());
        assert!(!err.forces_logout());
        assert!(err.keeps_prior_state());
    }

    #[test]
    fn test_classify_server_range() {
        for status in [500, 502, 503] {
            let err = ApiError::classify_status(status, ResourceKind::Clients, "boom");
            assert_matches!(err, ApiError::ServerFault { .. });
            assert!(err.keeps_prior_state());
        }
    }

    #[test]
    fn test_only_validation_is_user_correctable() {
        assert!(ApiError::invalid_field("email", "required").is_user_correctable());
        assert!(!ApiError::AuthExpired.is_user_correctable());
        assert!(!ApiError::conflict("stale").is_user_correctable());
        assert!(!ApiError::server_fault("boom").is_user_correctable());
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ApiError::AuthExpired.code(), "AUTH_EXPIRED");
        assert_eq!(ApiError::denied(ResourceKind::Tasks).code(), "AUTHZ_DENIED");
        assert_eq!(ApiError::transport("offline").code(), "TRANSPORT");
    }
}

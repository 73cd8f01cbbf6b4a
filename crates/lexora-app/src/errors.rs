//! Engine errors and user-facing notices
//!
//! Every failure surfaces as exactly one [`Notice`] with a severity the
//! frontend can route to its toast/banner machinery. Silent failures are
//! not permitted; neither are duplicate notifications for one underlying
//! error.

use lexora_core::effects::{LoginError, StoreError};
use lexora_core::{ApiError, ResourceKind};
use std::fmt;

/// Engine-level failures.
///
/// The client-side variants (`NotAuthenticated`, `NoActiveBranch`,
/// `BranchLocked`, `UnknownBranch`) fire before any network call is
/// issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// The operation needs a session and there is none.
    #[error("not signed in")]
    NotAuthenticated,

    /// A branch-scoped operation was attempted with no active branch.
    #[error("select a branch before continuing")]
    NoActiveBranch,

    /// A non-super-admin tried to change the active branch.
    #[error("branch selection is fixed for this account")]
    BranchLocked,

    /// The requested branch is not in the current branch list.
    #[error("unknown branch")]
    UnknownBranch,

    /// Classified backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Login-specific backend failure.
    #[error(transparent)]
    Login(#[from] LoginError),

    /// Local persisted-state failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Informational, auto-dismissable
    Info,
    /// Something went wrong but the user can proceed or retry
    Warning,
    /// The operation failed and needs attention
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity for toast routing
    pub level: NoticeLevel,
    /// Message shown to the user
    pub message: String,
}

impl Notice {
    /// Create a notice
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// The notice for a classified backend failure on one resource kind.
    ///
    /// `AuthExpired` maps to the forced-logout notice here so the message
    /// is produced in one place no matter which call tripped it.
    pub fn for_api_error(error: &ApiError, kind: ResourceKind) -> Self {
        match error {
            ApiError::AuthExpired => {
                Self::new(NoticeLevel::Warning, "Your session expired. Sign in again.")
            }
            ApiError::AuthorizationDenied { resource } => Self::new(
                NoticeLevel::Warning,
                format!("You no longer have access to {resource}."),
            ),
            ApiError::Validation { fields } => {
                let detail = if fields.is_empty() {
                    "Check the highlighted fields.".to_string()
                } else {
                    fields
                        .iter()
                        .map(|f| format!("{}: {}", f.field, f.message))
                        .collect::<Vec<_>>()
                        .join("; ")
                };
                Self::new(NoticeLevel::Info, detail)
            }
            ApiError::NotFound { .. } => Self::new(
                NoticeLevel::Warning,
                format!("The requested {kind} record was not found."),
            ),
            ApiError::Conflict { .. } => Self::new(
                NoticeLevel::Warning,
                format!("The {kind} record changed on the server. Reload and try again."),
            ),
            ApiError::ServerFault { .. } | ApiError::Transport { .. } => Self::new(
                NoticeLevel::Error,
                "Something went wrong. Try again later.",
            ),
        }
    }

    /// The notice for a login failure.
    pub fn for_login_error(error: &LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => {
                Self::new(NoticeLevel::Info, "Incorrect email or password.")
            }
            LoginError::AccountLocked => Self::new(
                NoticeLevel::Warning,
                "This account is locked. Contact your administrator.",
            ),
            LoginError::ServerFault { .. } | LoginError::Transport { .. } => Self::new(
                NoticeLevel::Error,
                "Sign-in is unavailable right now. Try again later.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexora_core::errors::FieldError;

    #[test]
    fn test_every_api_error_maps_to_one_notice() {
        let errors = [
            ApiError::AuthExpired,
            ApiError::denied(ResourceKind::FinancialRecords),
            ApiError::Validation { fields: Vec::new() },
            ApiError::not_found("gone"),
            ApiError::conflict("stale"),
            ApiError::server_fault("boom"),
            ApiError::transport("offline"),
        ];
        for error in errors {
            let notice = Notice::for_api_error(&error, ResourceKind::Clients);
            assert!(!notice.message.is_empty(), "{error} must produce a notice");
        }
    }

    #[test]
    fn test_validation_notice_lists_fields() {
        let error = ApiError::Validation {
            fields: vec![
                FieldError::new("email", "required"),
                FieldError::new("phone", "too short"),
            ],
        };
        let notice = Notice::for_api_error(&error, ResourceKind::Clients);
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(notice.message.contains("email: required"));
        assert!(notice.message.contains("phone: too short"));
    }

    #[test]
    fn test_denial_notice_names_the_resource() {
        let error = ApiError::denied(ResourceKind::FinancialRecords);
        let notice = Notice::for_api_error(&error, ResourceKind::FinancialRecords);
        assert!(notice.message.contains("financial-records"));
    }

    #[test]
    fn test_login_failures_are_distinguished() {
        let invalid = Notice::for_login_error(&LoginError::InvalidCredentials);
        let locked = Notice::for_login_error(&LoginError::AccountLocked);
        let fault = Notice::for_login_error(&LoginError::server_fault("boom"));
        assert_ne!(invalid.message, locked.message);
        assert_ne!(locked.message, fault.message);
    }
}

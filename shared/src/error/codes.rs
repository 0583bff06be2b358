//! Unified error codes for the menu builder
//!
//! This module defines all error codes used across menu-server and menu-client.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Dish library errors
//! - 4xxx: Menu and history errors
//! - 5xxx: Editor and export errors
//! - 6xxx: User account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Refresh token unknown, revoked or expired
    RefreshTokenInvalid = 1006,
    /// Password too short
    PasswordTooShort = 1007,
    /// Password reset code expired
    ResetCodeExpired = 1008,
    /// Password reset code invalid
    ResetCodeInvalid = 1009,
    /// Too many reset attempts
    TooManyAttempts = 1010,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Dish library ====================
    /// Dish not found
    DishNotFound = 3001,
    /// Sub-item not found
    SubItemNotFound = 3002,
    /// Cuisine is required
    CuisineRequired = 3003,
    /// Category is required
    CategoryRequired = 3004,

    // ==================== 4xxx: Menu / History ====================
    /// History record not found
    HistoryNotFound = 4001,
    /// Stored menu document could not be decoded
    MenuDataCorrupted = 4002,
    /// Menu preferences are invalid
    PreferencesInvalid = 4003,

    // ==================== 5xxx: Editor / Export ====================
    /// No edit session open
    NoEditSession = 5001,
    /// Operation requires the editing state
    NotEditing = 5002,
    /// An export is already running
    ExportInProgress = 5003,
    /// Section index out of range
    SectionNotFound = 5004,
    /// Item index out of range
    ItemNotFound = 5005,
    /// Suggestion not available for the section
    SuggestionNotFound = 5006,
    /// Dish has not been saved to the library yet
    DishNotPersisted = 5007,
    /// A save is committing the session's library writes
    SaveInProgress = 5008,

    // ==================== 6xxx: Users ====================
    /// User not found
    UserNotFound = 6001,
    /// Email already registered
    EmailAlreadyRegistered = 6002,
    /// Role is not admin or staff
    InvalidRole = 6003,
    /// Unknown admin action
    UnknownAction = 6004,
    /// Cannot delete own account
    CannotDeleteSelf = 6005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Mail delivery failed
    MailDeliveryFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::RefreshTokenInvalid => "Refresh token is invalid",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::ResetCodeExpired => "Reset code has expired",
            ErrorCode::ResetCodeInvalid => "Invalid reset code",
            ErrorCode::TooManyAttempts => "Too many attempts",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Dish library
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::SubItemNotFound => "Sub-item not found",
            ErrorCode::CuisineRequired => "Cuisine is required",
            ErrorCode::CategoryRequired => "Category is required",

            // Menu / History
            ErrorCode::HistoryNotFound => "Menu history record not found",
            ErrorCode::MenuDataCorrupted => "Stored menu could not be read",
            ErrorCode::PreferencesInvalid => "Menu preferences are invalid",

            // Editor / Export
            ErrorCode::NoEditSession => "No menu is open",
            ErrorCode::NotEditing => "Menu is not in editing mode",
            ErrorCode::ExportInProgress => "Export already in progress",
            ErrorCode::SectionNotFound => "Section not found",
            ErrorCode::ItemNotFound => "Menu item not found",
            ErrorCode::SuggestionNotFound => "Suggestion not found",
            ErrorCode::DishNotPersisted => "Dish has not been saved to the library",
            ErrorCode::SaveInProgress => "Save already in progress",

            // Users
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::InvalidRole => "Role must be admin or staff",
            ErrorCode::UnknownAction => "Unknown action",
            ErrorCode::CannotDeleteSelf => "You cannot delete your own account",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::MailDeliveryFailed => "Mail delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1006 => Ok(ErrorCode::RefreshTokenInvalid),
            1007 => Ok(ErrorCode::PasswordTooShort),
            1008 => Ok(ErrorCode::ResetCodeExpired),
            1009 => Ok(ErrorCode::ResetCodeInvalid),
            1010 => Ok(ErrorCode::TooManyAttempts),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Dish library
            3001 => Ok(ErrorCode::DishNotFound),
            3002 => Ok(ErrorCode::SubItemNotFound),
            3003 => Ok(ErrorCode::CuisineRequired),
            3004 => Ok(ErrorCode::CategoryRequired),

            // Menu / History
            4001 => Ok(ErrorCode::HistoryNotFound),
            4002 => Ok(ErrorCode::MenuDataCorrupted),
            4003 => Ok(ErrorCode::PreferencesInvalid),

            // Editor / Export
            5001 => Ok(ErrorCode::NoEditSession),
            5002 => Ok(ErrorCode::NotEditing),
            5003 => Ok(ErrorCode::ExportInProgress),
            5004 => Ok(ErrorCode::SectionNotFound),
            5005 => Ok(ErrorCode::ItemNotFound),
            5006 => Ok(ErrorCode::SuggestionNotFound),
            5007 => Ok(ErrorCode::DishNotPersisted),
            5008 => Ok(ErrorCode::SaveInProgress),

            // Users
            6001 => Ok(ErrorCode::UserNotFound),
            6002 => Ok(ErrorCode::EmailAlreadyRegistered),
            6003 => Ok(ErrorCode::InvalidRole),
            6004 => Ok(ErrorCode::UnknownAction),
            6005 => Ok(ErrorCode::CannotDeleteSelf),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::MailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::DishNotFound.code(), 3001);
        assert_eq!(ErrorCode::HistoryNotFound.code(), 4001);
        assert_eq!(ErrorCode::ExportInProgress.code(), 5003);
        assert_eq!(ErrorCode::CannotDeleteSelf.code(), 6005);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::DishNotFound.is_success());
    }

    #[test]
    fn test_try_from_covers_every_declared_code() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RequiredField,
            ErrorCode::TooManyAttempts,
            ErrorCode::AdminRequired,
            ErrorCode::CategoryRequired,
            ErrorCode::PreferencesInvalid,
            ErrorCode::DishNotPersisted,
            ErrorCode::SaveInProgress,
            ErrorCode::CannotDeleteSelf,
            ErrorCode::MailDeliveryFailed,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
        assert_eq!(ErrorCode::try_from(2002), Err(InvalidErrorCode(2002)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::DishNotFound).unwrap(),
            "3001"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("6005").unwrap();
        assert_eq!(code, ErrorCode::CannotDeleteSelf);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::CannotDeleteSelf.message(),
            "You cannot delete your own account"
        );
        assert_eq!(ErrorCode::UnknownAction.message(), "Unknown action");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}

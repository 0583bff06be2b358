//! Request/response types shared between menu-server and menu-client
//!
//! Successful responses carry these types directly; failures carry an
//! [`ApiResponse`](crate::ApiResponse) error body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Menu, MenuItem, Profile};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Sign-up / sign-in request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Authenticated session handed to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (unix seconds)
    pub expires_at: i64,
    pub profile: Profile,
}

/// Refresh token rotation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Consume a password reset code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6, message = "Reset code must be 6 digits"))]
    pub code: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Admin-issued password reset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetIssued {
    pub email: String,
    /// Code expiry (unix millis)
    pub expires_at: i64,
}

// =============================================================================
// Admin users endpoint
// =============================================================================

/// Body of `POST /api/admin-users`
///
/// Every field is optional so that missing-field errors are reported by the
/// handler rather than by deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUsersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl AdminUsersRequest {
    pub fn create(email: &str, password: &str, role: &str) -> Self {
        Self {
            action: Some("create".to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            role: Some(role.to_string()),
            user_id: None,
        }
    }

    pub fn delete(user_id: &str) -> Self {
        Self {
            action: Some("delete".to_string()),
            user_id: Some(user_id.to_string()),
            ..Self::default()
        }
    }
}

/// Result of an admin `create` action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub user_id: String,
    pub profile: Profile,
}

/// `{ "success": true }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Banner image override for a cuisine label
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BannerUpdate {
    #[validate(url(message = "Banner must be an absolute URL"))]
    pub image_url: String,
}

// =============================================================================
// Menus
// =============================================================================

/// Result of `POST /api/menus/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMenu {
    pub menu: Menu,
    /// History record the menu was archived to
    pub history_id: String,
}

// =============================================================================
// Editor
// =============================================================================

/// Edit session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Viewing,
    Editing,
    /// Pending library writes are being committed
    Saving,
    Exporting,
}

/// Snapshot of the caller's edit session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSessionView {
    pub mode: EditorMode,
    pub history_id: Option<String>,
    pub menu: Menu,
    /// Number of queued library writes awaiting save
    pub pending_ops: usize,
    /// Suggested items keyed by section index
    pub suggestions: BTreeMap<usize, Vec<MenuItem>>,
}

/// Open an edit session on an unsaved menu
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMenuRequest {
    pub menu: Menu,
}

/// Menu-level text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuField {
    Title,
    EventDescription,
    WinePairing,
    ChefsNotes,
    BannerUrl,
}

/// One editing operation on the draft menu
///
/// Sections and items are addressed by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditCommand {
    UpdateMenuField {
        field: MenuField,
        value: String,
    },
    UpdateSectionTitle {
        section: usize,
        title: String,
    },
    UpdateItem {
        section: usize,
        item: usize,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        dietary_tags: Option<Vec<String>>,
    },
    AddItem {
        section: usize,
    },
    RemoveItem {
        section: usize,
        item: usize,
    },
    SwapItem {
        section: usize,
        item: usize,
        dish_id: String,
    },
    AddSection {
        title: String,
        #[serde(default)]
        auto_fill: bool,
    },
    AddSuggestion {
        section: usize,
        index: usize,
    },
    AttachSubItem {
        section: usize,
        item: usize,
        sub_item_id: String,
    },
    DetachSubItem {
        section: usize,
        item: usize,
        sub_item_id: String,
    },
    CreateSubItem {
        section: usize,
        item: usize,
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        dietary_tags: Vec<String>,
    },
    UpdateSubItem {
        section: usize,
        item: usize,
        sub_item_id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    DeleteSubItem {
        section: usize,
        item: usize,
        sub_item_id: String,
    },
}

/// Swap candidates query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesQuery {
    pub section: usize,
    pub item: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_command_wire_format() {
        let json = r#"{"op":"swapItem","section":1,"item":0,"dishId":"d-1"}"#;
        let cmd: EditCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            EditCommand::SwapItem {
                section: 1,
                item: 0,
                dish_id: "d-1".to_string()
            }
        );

        let json = r#"{"op":"updateMenuField","field":"chefsNotes","value":"x"}"#;
        let cmd: EditCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            EditCommand::UpdateMenuField {
                field: MenuField::ChefsNotes,
                ..
            }
        ));
    }

    #[test]
    fn test_admin_users_request_omits_absent_fields() {
        let json = serde_json::to_string(&AdminUsersRequest::delete("u-1")).unwrap();
        assert_eq!(json, r#"{"action":"delete","userId":"u-1"}"#);

        let req: AdminUsersRequest = serde_json::from_str("{}").unwrap();
        assert!(req.action.is_none());
    }

    #[test]
    fn test_credentials_validation() {
        let creds = Credentials {
            email: "chef@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(creds.validate().is_err());

        let creds = Credentials {
            email: "chef@example.com".to_string(),
            password: "long-enough".to_string(),
        };
        assert!(creds.validate().is_ok());
    }
}

//! Menu history record

use serde::{Deserialize, Serialize};

use super::menu::{Menu, Preferences};

/// Archived menu with its event metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    /// Owner; kept even after the account is deleted
    pub user_id: String,
    pub title: String,
    pub menu: Menu,
    pub client_name: String,
    pub event_name: String,
    pub guest_count: u32,
    pub event_date: String,
    pub created_at: i64,
}

/// Save-to-history payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryCreate {
    pub menu: Menu,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub guest_count: u32,
    #[serde(default)]
    pub event_date: String,
}

impl HistoryCreate {
    pub fn from_preferences(prefs: &Preferences, menu: Menu) -> Self {
        Self {
            menu,
            client_name: prefs.client_name.clone(),
            event_name: prefs.event_name.clone(),
            guest_count: prefs.guest_count,
            event_date: prefs.event_date.clone(),
        }
    }
}

//! Menu generation API Handlers

use axum::{Json, extract::State};
use shared::client::GeneratedMenu;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{HistoryCreate, Preferences};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::db;
use crate::services::assembly;
use crate::state::AppState;

/// POST /api/menus/generate - assemble a menu and archive it for the caller
pub async fn generate(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(prefs): Json<Preferences>,
) -> AppResult<Json<GeneratedMenu>> {
    prefs
        .validate()
        .map_err(|e| AppError::with_message(ErrorCode::PreferencesInvalid, e.to_string()))?;

    let menu = assembly::generate(&state.pool, &prefs).await?;
    let record = db::history::create(
        &state.pool,
        &user.id,
        HistoryCreate::from_preferences(&prefs, menu),
    )
    .await?;

    tracing::info!(
        user_id = %user.id,
        history_id = %record.id,
        sections = record.menu.sections.len(),
        "Menu generated"
    );
    Ok(Json(GeneratedMenu {
        menu: record.menu,
        history_id: record.id,
    }))
}

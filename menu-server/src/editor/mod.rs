//! Menu edit sessions
//!
//! - [`EditSession`] - draft menu, mode and queued library writes
//! - [`SessionStore`] - one session per user, in memory only
//! - the async functions below resolve library data, then mutate the session
//!   under its map entry without holding it across an await

pub mod ops;
pub mod session;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::bucket::BucketRules;
use shared::client::{EditCommand, EditSessionView, EditorMode};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{HistoryCreate, HistoryRecord, MenuItem, MenuSubItem};
use sqlx::SqlitePool;

use crate::db;
use crate::export::{self, ExportOutput};
use crate::services::{assembly, library};

pub use ops::PendingOp;
pub use session::{EditSession, Resolved};

/// Items placed in an auto-filled section, and suggestions kept alongside
const AUTO_FILL_COUNT: usize = 2;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, EditSession>,
}

impl SessionStore {
    /// Start a session for `user_id`, replacing any previous one unless it
    /// is saving
    pub fn open(&self, user_id: &str, session: EditSession) -> AppResult<EditSessionView> {
        let view = session.view();
        match self.sessions.entry(user_id.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.get().ensure_not_saving()?;
                entry.insert(session);
            }
            Entry::Vacant(entry) => {
                entry.insert(session);
            }
        }
        Ok(view)
    }

    /// Discard the caller's session; a saving session is kept
    pub fn close(&self, user_id: &str) -> AppResult<()> {
        let removed = self
            .sessions
            .remove_if(user_id, |_, s| s.mode() != EditorMode::Saving);
        match removed {
            Some(_) => Ok(()),
            None if self.sessions.contains_key(user_id) => {
                Err(AppError::new(ErrorCode::SaveInProgress))
            }
            None => Err(AppError::new(ErrorCode::NoEditSession)),
        }
    }

    pub fn view(&self, user_id: &str) -> AppResult<EditSessionView> {
        self.with(user_id, |s| Ok(s.view()))
    }

    pub fn with<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&EditSession) -> AppResult<T>,
    ) -> AppResult<T> {
        let session = self
            .sessions
            .get(user_id)
            .ok_or_else(|| AppError::new(ErrorCode::NoEditSession))?;
        f(&session)
    }

    pub fn with_mut<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut EditSession) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut session = self
            .sessions
            .get_mut(user_id)
            .ok_or_else(|| AppError::new(ErrorCode::NoEditSession))?;
        f(&mut session)
    }
}

/// Returns the session to `viewing` when an export ends, however it ends
struct ExportGuard<'a> {
    store: &'a SessionStore,
    user_id: &'a str,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        if let Some(mut session) = self.store.sessions.get_mut(self.user_id) {
            session.finish_export();
        }
    }
}

/// Puts a session left in `saving` back to `editing` when a save fails
struct SaveGuard<'a> {
    store: &'a SessionStore,
    user_id: &'a str,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        if let Some(mut session) = self.store.sessions.get_mut(self.user_id) {
            session.abort_save();
        }
    }
}

/// Export the draft; a second export while one is running is rejected
pub fn export(store: &SessionStore, user_id: &str) -> AppResult<ExportOutput> {
    let menu = store.with_mut(user_id, |s| s.begin_export())?;
    let _guard = ExportGuard { store, user_id };
    Ok(export::export_menu(&menu))
}

/// Load whatever library data `command` needs
async fn resolve(
    pool: &SqlitePool,
    store: &SessionStore,
    user_id: &str,
    command: &EditCommand,
) -> AppResult<Resolved> {
    match command {
        EditCommand::SwapItem {
            section,
            item,
            dish_id,
        } => {
            store.with(user_id, |s| {
                s.ensure_editing()?;
                s.item(*section, *item).map(|_| ())
            })?;
            let mut dish = db::dishes::find_by_id(pool, dish_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::DishNotFound))?;
            dish.sub_items = db::sub_items::find_by_dish(pool, &dish.id).await?;
            Ok(Resolved::Replacement(MenuItem::from(dish)))
        }
        EditCommand::AddSection {
            title,
            auto_fill: true,
        } => {
            let label = store.with(user_id, |s| {
                s.ensure_editing()?;
                Ok(s.menu().cuisine_label.clone())
            })?;
            let bucket = BucketRules::section_title().classify(title);
            let candidates: Vec<MenuItem> = match library::in_bucket(pool, &label, bucket).await {
                Ok(dishes) => dishes.into_iter().map(MenuItem::from).collect(),
                Err(e) => {
                    tracing::warn!(error = %e, section = %title, "Auto-fill failed, adding empty section");
                    Vec::new()
                }
            };
            Ok(auto_fill(candidates))
        }
        EditCommand::AttachSubItem { sub_item_id, .. } => {
            let sub = db::sub_items::find_by_id(pool, sub_item_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::SubItemNotFound))?;
            Ok(Resolved::SubItem(MenuSubItem::from(sub)))
        }
        _ => Ok(Resolved::Nothing),
    }
}

/// Two items for the section plus two suggestions with different names
fn auto_fill(candidates: Vec<MenuItem>) -> Resolved {
    let mut rng = rand::thread_rng();
    let items = assembly::sample(candidates.clone(), AUTO_FILL_COUNT, &mut rng);
    let rest: Vec<MenuItem> = candidates
        .into_iter()
        .filter(|c| !items.iter().any(|i| i.name == c.name))
        .collect();
    let suggestions = assembly::sample(rest, AUTO_FILL_COUNT, &mut rng);
    Resolved::Fill { items, suggestions }
}

/// Apply one editing command to the caller's session
pub async fn apply(
    pool: &SqlitePool,
    store: &SessionStore,
    user_id: &str,
    command: EditCommand,
) -> AppResult<EditSessionView> {
    let resolved = resolve(pool, store, user_id, &command).await?;
    store.with_mut(user_id, |s| {
        s.apply(command, resolved)?;
        Ok(s.view())
    })
}

/// Swap candidates: library dishes in the section's bucket, minus the
/// current item's name
pub async fn alternatives(
    pool: &SqlitePool,
    store: &SessionStore,
    user_id: &str,
    section: usize,
    item: usize,
) -> AppResult<Vec<MenuItem>> {
    let (title, current, label) = store.with(user_id, |s| {
        let category = s.section(section)?.category.clone();
        let name = s.item(section, item)?.name.clone();
        Ok((category, name, s.menu().cuisine_label.clone()))
    })?;

    let bucket = BucketRules::section_title().classify(&title);
    let dishes = library::in_bucket(pool, &label, bucket).await?;
    Ok(dishes
        .into_iter()
        .filter(|d| d.name != current)
        .map(MenuItem::from)
        .collect())
}

/// Commit pending writes in one transaction and return to `viewing`
///
/// The session sits in `saving` during the commit, which blocks edits,
/// reopening and closing. On failure nothing is written and the session
/// keeps its draft, its queue and its `editing` mode.
pub async fn save(
    pool: &SqlitePool,
    store: &SessionStore,
    user_id: &str,
) -> AppResult<EditSessionView> {
    let ops = store.with_mut(user_id, |s| s.begin_save())?;
    let _guard = SaveGuard { store, user_id };

    if let Err(e) = ops::commit(pool, &ops).await {
        tracing::error!(user_id = %user_id, pending = ops.len(), error = %e, "Edit session save failed");
        return Err(e.into());
    }

    tracing::info!(user_id = %user_id, committed = ops.len(), "Edit session saved");
    store.with_mut(user_id, |s| {
        s.finish_save();
        Ok(s.view())
    })
}

/// Write the draft to history as a new record owned by the caller
///
/// Event metadata is carried over from the record the session was opened
/// from, if any.
pub async fn archive(
    pool: &SqlitePool,
    store: &SessionStore,
    user_id: &str,
) -> AppResult<HistoryRecord> {
    let (menu, source) = store.with(user_id, |s| {
        Ok((s.menu().clone(), s.history_id().map(str::to_string)))
    })?;

    let previous = match source {
        Some(id) => db::history::find_by_id(pool, &id).await?,
        None => None,
    };
    let data = match previous {
        Some(prev) => HistoryCreate {
            menu,
            client_name: prev.client_name,
            event_name: prev.event_name,
            guest_count: prev.guest_count,
            event_date: prev.event_date,
        },
        None => HistoryCreate {
            menu,
            client_name: String::new(),
            event_name: String::new(),
            guest_count: 0,
            event_date: String::new(),
        },
    };

    let record = db::history::create(pool, user_id, data).await?;
    // The session may have been replaced meanwhile; that is not an error
    let _ = store.with_mut(user_id, |s| {
        s.set_history_id(record.id.clone());
        Ok(())
    });
    Ok(record)
}

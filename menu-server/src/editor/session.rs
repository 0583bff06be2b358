//! Edit session state machine
//!
//! A session owns a draft copy of a menu and the library writes queued while
//! editing it. Every method here is synchronous; library lookups needed by a
//! command are resolved beforehand and passed in as [`Resolved`].
//!
//! ```text
//! viewing --begin_edit--> editing --begin_save--> saving --finish_save--> viewing
//!    \                       |  ^                    |
//!     \                      |  +----abort_save------+
//!      +---begin_export------+--> exporting --finish_export--> viewing
//! ```

use std::collections::BTreeMap;

use shared::client::{EditCommand, EditSessionView, EditorMode, MenuField};
use shared::cuisine;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DishCreate, Menu, MenuItem, MenuSubItem, Section, SubItemCreate, SubItemUpdate};
use shared::util::new_id;

use super::ops::PendingOp;

pub const DEFAULT_ITEM_NAME: &str = "Chef's Signature Selection";
const DEFAULT_ITEM_DESCRIPTION: &str =
    "A freshly curated seasonal creation based on your event theme.";
const DEFAULT_ITEM_TAG: &str = "Veg";
/// Stored cuisine for new dishes when the menu label maps to none
const FALLBACK_CUISINE: &str = "Punjabi/North Indian";

/// Library data a command needs, loaded before the session is locked
#[derive(Debug, Clone, Default)]
pub enum Resolved {
    #[default]
    Nothing,
    /// Dish chosen for a swap
    Replacement(MenuItem),
    /// Auto-fill for a new section
    Fill {
        items: Vec<MenuItem>,
        suggestions: Vec<MenuItem>,
    },
    /// Library sub-item to attach
    SubItem(MenuSubItem),
}

#[derive(Debug, Clone)]
pub struct EditSession {
    mode: EditorMode,
    history_id: Option<String>,
    menu: Menu,
    pending: Vec<PendingOp>,
    suggestions: BTreeMap<usize, Vec<MenuItem>>,
}

impl EditSession {
    /// New session in `viewing` on a copy of `menu`
    pub fn open(menu: Menu, history_id: Option<String>) -> Self {
        Self {
            mode: EditorMode::Viewing,
            history_id,
            menu,
            pending: Vec::new(),
            suggestions: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn history_id(&self) -> Option<&str> {
        self.history_id.as_deref()
    }

    pub fn set_history_id(&mut self, id: String) {
        self.history_id = Some(id);
    }

    pub fn pending(&self) -> &[PendingOp] {
        &self.pending
    }

    pub fn view(&self) -> EditSessionView {
        EditSessionView {
            mode: self.mode,
            history_id: self.history_id.clone(),
            menu: self.menu.clone(),
            pending_ops: self.pending.len(),
            suggestions: self.suggestions.clone(),
        }
    }

    /// `viewing → editing`; entering edit mode twice is a no-op
    pub fn begin_edit(&mut self) -> AppResult<()> {
        match self.mode {
            EditorMode::Exporting => Err(AppError::new(ErrorCode::ExportInProgress)),
            EditorMode::Saving => Err(AppError::new(ErrorCode::SaveInProgress)),
            _ => {
                self.mode = EditorMode::Editing;
                Ok(())
            }
        }
    }

    pub fn ensure_editing(&self) -> AppResult<()> {
        match self.mode {
            EditorMode::Editing => Ok(()),
            EditorMode::Saving => Err(AppError::new(ErrorCode::SaveInProgress)),
            _ => Err(AppError::new(ErrorCode::NotEditing)),
        }
    }

    /// Fails while a save holds the session, so it cannot be replaced or dropped
    pub fn ensure_not_saving(&self) -> AppResult<()> {
        if self.mode == EditorMode::Saving {
            return Err(AppError::new(ErrorCode::SaveInProgress));
        }
        Ok(())
    }

    /// `editing → saving`; returns the writes to commit
    ///
    /// The queue is frozen until [`finish_save`](Self::finish_save) or
    /// [`abort_save`](Self::abort_save).
    pub fn begin_save(&mut self) -> AppResult<Vec<PendingOp>> {
        self.ensure_editing()?;
        self.mode = EditorMode::Saving;
        Ok(self.pending.clone())
    }

    /// `saving → viewing` once the queued writes are committed
    pub fn finish_save(&mut self) {
        if self.mode == EditorMode::Saving {
            self.pending.clear();
            self.mode = EditorMode::Viewing;
        }
    }

    /// `saving → editing` with the queue untouched
    pub fn abort_save(&mut self) {
        if self.mode == EditorMode::Saving {
            self.mode = EditorMode::Editing;
        }
    }

    /// Enter `exporting` and return the menu to render
    pub fn begin_export(&mut self) -> AppResult<Menu> {
        match self.mode {
            EditorMode::Exporting => return Err(AppError::new(ErrorCode::ExportInProgress)),
            EditorMode::Saving => return Err(AppError::new(ErrorCode::SaveInProgress)),
            _ => {}
        }
        self.mode = EditorMode::Exporting;
        Ok(self.menu.clone())
    }

    pub fn finish_export(&mut self) {
        if self.mode == EditorMode::Exporting {
            self.mode = EditorMode::Viewing;
        }
    }

    pub fn section(&self, section: usize) -> AppResult<&Section> {
        self.menu
            .sections
            .get(section)
            .ok_or_else(|| AppError::new(ErrorCode::SectionNotFound).with_detail("section", section))
    }

    pub fn item(&self, section: usize, item: usize) -> AppResult<&MenuItem> {
        self.section(section)?
            .items
            .get(item)
            .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound).with_detail("item", item))
    }

    fn section_mut(&mut self, section: usize) -> AppResult<&mut Section> {
        self.menu
            .sections
            .get_mut(section)
            .ok_or_else(|| AppError::new(ErrorCode::SectionNotFound).with_detail("section", section))
    }

    fn item_mut(&mut self, section: usize, item: usize) -> AppResult<&mut MenuItem> {
        self.section_mut(section)?
            .items
            .get_mut(item)
            .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound).with_detail("item", item))
    }

    fn is_pending_dish(&self, id: &str) -> bool {
        self.pending.iter().any(|op| op.created_dish() == Some(id))
    }

    /// Library id of an item whose dish already exists in the library
    fn persisted_dish(&self, section: usize, item: usize) -> AppResult<String> {
        match &self.item(section, item)?.id {
            Some(id) if !self.is_pending_dish(id) => Ok(id.clone()),
            _ => Err(AppError::new(ErrorCode::DishNotPersisted)),
        }
    }

    /// Apply one command to the draft, queueing library writes as needed
    pub fn apply(&mut self, command: EditCommand, resolved: Resolved) -> AppResult<()> {
        self.ensure_editing()?;

        match command {
            EditCommand::UpdateMenuField { field, value } => {
                let target = match field {
                    MenuField::Title => &mut self.menu.title,
                    MenuField::EventDescription => &mut self.menu.event_description,
                    MenuField::WinePairing => &mut self.menu.wine_pairing,
                    MenuField::ChefsNotes => &mut self.menu.chefs_notes,
                    MenuField::BannerUrl => &mut self.menu.banner_url,
                };
                *target = value;
            }
            EditCommand::UpdateSectionTitle { section, title } => {
                self.section_mut(section)?.category = title;
            }
            EditCommand::UpdateItem {
                section,
                item,
                name,
                description,
                dietary_tags,
            } => {
                let target = self.item_mut(section, item)?;
                if let Some(name) = name {
                    target.name = name;
                }
                if let Some(description) = description {
                    target.description = description;
                }
                if let Some(tags) = dietary_tags {
                    target.dietary_tags = tags;
                }
            }
            EditCommand::AddItem { section } => self.add_item(section)?,
            EditCommand::RemoveItem { section, item } => {
                self.item(section, item)?;
                let removed = self.section_mut(section)?.items.remove(item);
                self.forget_item(&removed);
            }
            EditCommand::SwapItem { section, item, .. } => {
                let Resolved::Replacement(replacement) = resolved else {
                    return Err(AppError::internal("swap requires a replacement dish"));
                };
                let slot = self.item_mut(section, item)?;
                let previous = std::mem::replace(slot, replacement);
                self.forget_item(&previous);
            }
            EditCommand::AddSection { title, .. } => {
                let (items, suggestions) = match resolved {
                    Resolved::Fill { items, suggestions } => (items, suggestions),
                    _ => (Vec::new(), Vec::new()),
                };
                let index = self.menu.sections.len();
                self.menu.sections.push(Section {
                    id: None,
                    category: title,
                    items,
                });
                if !suggestions.is_empty() {
                    self.suggestions.insert(index, suggestions);
                }
            }
            EditCommand::AddSuggestion { section, index } => {
                self.section(section)?;
                let suggestion = self
                    .suggestions
                    .get_mut(&section)
                    .filter(|list| index < list.len())
                    .map(|list| list.remove(index))
                    .ok_or_else(|| AppError::new(ErrorCode::SuggestionNotFound))?;
                let items = &mut self.section_mut(section)?.items;
                if !items.iter().any(|i| i.name == suggestion.name) {
                    items.push(suggestion);
                }
            }
            EditCommand::AttachSubItem { section, item, .. } => {
                let Resolved::SubItem(sub) = resolved else {
                    return Err(AppError::internal("attach requires a library sub-item"));
                };
                let target = self.item_mut(section, item)?;
                if !target.sub_items.iter().any(|s| s.id == sub.id) {
                    target.sub_items.push(sub);
                }
            }
            EditCommand::DetachSubItem {
                section,
                item,
                sub_item_id,
            } => {
                let target = self.item_mut(section, item)?;
                let before = target.sub_items.len();
                target
                    .sub_items
                    .retain(|s| s.id.as_deref() != Some(sub_item_id.as_str()));
                if target.sub_items.len() == before {
                    return Err(AppError::new(ErrorCode::SubItemNotFound));
                }
            }
            EditCommand::CreateSubItem {
                section,
                item,
                name,
                description,
                dietary_tags,
            } => {
                let dish_id = self.persisted_dish(section, item)?;
                let id = new_id();
                self.item_mut(section, item)?.sub_items.push(MenuSubItem {
                    id: Some(id.clone()),
                    name: name.clone(),
                    description: description.clone(),
                    dietary_tags: dietary_tags.clone(),
                });
                self.pending.push(PendingOp::CreateSubItem {
                    id,
                    dish_id,
                    data: SubItemCreate {
                        name,
                        description,
                        dietary_tags,
                    },
                });
            }
            EditCommand::UpdateSubItem {
                section,
                item,
                sub_item_id,
                name,
                description,
            } => {
                self.persisted_dish(section, item)?;
                let sub = self
                    .item_mut(section, item)?
                    .sub_items
                    .iter_mut()
                    .find(|s| s.id.as_deref() == Some(sub_item_id.as_str()))
                    .ok_or_else(|| AppError::new(ErrorCode::SubItemNotFound))?;
                if let Some(name) = &name {
                    sub.name = name.clone();
                }
                if let Some(description) = &description {
                    sub.description = description.clone();
                }
                self.pending.push(PendingOp::UpdateSubItem {
                    id: sub_item_id,
                    data: SubItemUpdate {
                        name,
                        description,
                        dietary_tags: None,
                    },
                });
            }
            EditCommand::DeleteSubItem {
                section,
                item,
                sub_item_id,
            } => {
                self.persisted_dish(section, item)?;
                let target = self.item_mut(section, item)?;
                let before = target.sub_items.len();
                target
                    .sub_items
                    .retain(|s| s.id.as_deref() != Some(sub_item_id.as_str()));
                if target.sub_items.len() == before {
                    return Err(AppError::new(ErrorCode::SubItemNotFound));
                }

                let created_here = self.pending.iter().any(|op| {
                    matches!(op, PendingOp::CreateSubItem { id, .. } if *id == sub_item_id)
                });
                if created_here {
                    self.pending.retain(|op| match op {
                        PendingOp::CreateSubItem { id, .. } | PendingOp::UpdateSubItem { id, .. } => {
                            *id != sub_item_id
                        }
                        _ => true,
                    });
                } else {
                    self.pending.push(PendingOp::DeleteSubItem { id: sub_item_id });
                }
            }
        }
        Ok(())
    }

    fn add_item(&mut self, section: usize) -> AppResult<()> {
        let category = self.section(section)?.category.clone();
        let cuisine = cuisine::stored_cuisine(&self.menu.cuisine_label)
            .unwrap_or_else(|| FALLBACK_CUISINE.to_string());

        let id = new_id();
        let item = MenuItem {
            id: Some(id.clone()),
            name: DEFAULT_ITEM_NAME.to_string(),
            description: DEFAULT_ITEM_DESCRIPTION.to_string(),
            dietary_tags: vec![DEFAULT_ITEM_TAG.to_string()],
            image_url: None,
            sub_items: Vec::new(),
        };
        self.pending.push(PendingOp::CreateDish {
            id,
            data: DishCreate {
                name: item.name.clone(),
                description: item.description.clone(),
                dietary_tags: item.dietary_tags.clone(),
                image_url: None,
                category,
                cuisine,
            },
        });
        self.section_mut(section)?.items.push(item);
        Ok(())
    }

    /// Drop the queued creation of an item that left the draft
    fn forget_item(&mut self, item: &MenuItem) {
        if let Some(id) = &item.id {
            self.pending.retain(|op| op.created_dish() != Some(id.as_str()));
        }
    }
}

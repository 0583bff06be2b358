//! Library writes queued by an edit session
//!
//! Ids are assigned when an operation is queued, so the draft can refer to a
//! dish or sub-item before it exists. [`commit`] applies the queue in order
//! inside one transaction.

use shared::models::{DishCreate, SubItemCreate, SubItemUpdate};
use sqlx::SqlitePool;

use crate::db::{self, RepoError, RepoResult};

#[derive(Debug, Clone)]
pub enum PendingOp {
    CreateDish { id: String, data: DishCreate },
    CreateSubItem { id: String, dish_id: String, data: SubItemCreate },
    UpdateSubItem { id: String, data: SubItemUpdate },
    DeleteSubItem { id: String },
}

impl PendingOp {
    /// Dish created by this op, if any
    pub fn created_dish(&self) -> Option<&str> {
        match self {
            Self::CreateDish { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Apply `ops` atomically; any failure rolls back every op
pub async fn commit(pool: &SqlitePool, ops: &[PendingOp]) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    for op in ops {
        match op {
            PendingOp::CreateDish { id, data } => {
                db::dishes::create(&mut *tx, id, data).await?;
            }
            PendingOp::CreateSubItem { id, dish_id, data } => {
                db::sub_items::create(&mut *tx, id, dish_id, data).await?;
            }
            PendingOp::UpdateSubItem { id, data } => {
                if db::sub_items::update(&mut *tx, id, data).await?.is_none() {
                    return Err(RepoError::NotFound(format!("sub_items/{id}")));
                }
            }
            PendingOp::DeleteSubItem { id } => {
                if !db::sub_items::delete(&mut *tx, id).await? {
                    return Err(RepoError::NotFound(format!("sub_items/{id}")));
                }
            }
        }
    }

    tx.commit().await?;
    Ok(())
}

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::progress::{Progress as DomainProgress, ProgressUpdate};
use crate::domain::types::{ProgressId, RoomId, TypeConstraintError, UserId};

/// Diesel model representing the `user_progress` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::user_progress)]
pub struct Progress {
    pub id: String,
    pub user_id: String,
    pub room_id: String,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Progress`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::user_progress)]
pub struct NewProgress {
    pub id: String,
    pub user_id: String,
    pub room_id: String,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
}

impl NewProgress {
    pub fn with_id(id: ProgressId, update: &ProgressUpdate) -> Self {
        Self {
            id: id.into_inner(),
            user_id: update.user_id.as_str().to_string(),
            room_id: update.room_id.as_str().to_string(),
            completed: update.completed,
            completed_at: update.completed_at,
        }
    }
}

impl TryFrom<Progress> for DomainProgress {
    type Error = TypeConstraintError;

    fn try_from(progress: Progress) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProgressId::new(progress.id)?,
            user_id: UserId::new(progress.user_id)?,
            room_id: RoomId::new(progress.room_id)?,
            completed: progress.completed,
            completed_at: progress.completed_at,
            created_at: progress.created_at,
        })
    }
}

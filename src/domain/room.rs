use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, DisplayOrder, RoomId, RoomTitle, RoomUrl};

/// A single training exercise belonging to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub title: RoomTitle,
    pub url: RoomUrl,
    pub category_id: CategoryId,
    /// Position within the owning category, starting at 1.
    pub display_order: DisplayOrder,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Room`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRoom {
    pub title: RoomTitle,
    pub url: RoomUrl,
    pub category_id: CategoryId,
    pub display_order: DisplayOrder,
}

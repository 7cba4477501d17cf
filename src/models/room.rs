use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::room::{NewRoom as DomainNewRoom, Room as DomainRoom};
use crate::domain::types::{CategoryId, RoomId, RoomTitle, RoomUrl, TypeConstraintError};

/// Diesel model representing the `rooms` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::rooms)]
pub struct Room {
    pub id: String,
    pub title: String,
    pub url: String,
    pub category_id: String,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Room`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::rooms)]
pub struct NewRoom {
    pub id: String,
    pub title: String,
    pub url: String,
    pub category_id: String,
    pub display_order: i32,
}

impl NewRoom {
    pub fn with_id(id: RoomId, room: &DomainNewRoom) -> Self {
        Self {
            id: id.into_inner(),
            title: room.title.as_str().to_string(),
            url: room.url.as_str().to_string(),
            category_id: room.category_id.as_str().to_string(),
            display_order: room.display_order.get(),
        }
    }
}

impl TryFrom<Room> for DomainRoom {
    type Error = TypeConstraintError;

    fn try_from(room: Room) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoomId::new(room.id)?,
            title: RoomTitle::new(room.title)?,
            url: RoomUrl::new(room.url)?,
            category_id: CategoryId::new(room.category_id)?,
            display_order: room.display_order.try_into()?,
            created_at: room.created_at,
        })
    }
}

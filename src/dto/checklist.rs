use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::room::Room;

/// A room as shown to one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomProgressDto {
    pub id: String,
    pub title: String,
    pub url: String,
    pub completed: bool,
}

impl RoomProgressDto {
    pub fn new(room: Room, completed: bool) -> Self {
        Self {
            id: room.id.into_inner(),
            title: room.title.into_inner(),
            url: room.url.into_inner(),
            completed,
        }
    }
}

/// A category with its rooms and how many of them are done.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProgressDto {
    pub id: String,
    pub name: String,
    pub total_rooms: usize,
    pub completed_rooms: usize,
    pub rooms: Vec<RoomProgressDto>,
}

impl CategoryProgressDto {
    pub fn new(category: Category, rooms: Vec<RoomProgressDto>) -> Self {
        Self {
            id: category.id.into_inner(),
            name: category.name.into_inner(),
            total_rooms: rooms.len(),
            completed_rooms: rooms.iter().filter(|r| r.completed).count(),
            rooms,
        }
    }
}

/// The whole checklist for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistDto {
    pub categories: Vec<CategoryProgressDto>,
    pub completed: usize,
    pub total: usize,
}

impl From<Vec<CategoryProgressDto>> for ChecklistDto {
    fn from(categories: Vec<CategoryProgressDto>) -> Self {
        Self {
            completed: categories.iter().map(|c| c.completed_rooms).sum(),
            total: categories.iter().map(|c| c.total_rooms).sum(),
            categories,
        }
    }
}

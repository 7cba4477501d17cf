use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};

use crate::domain::category::{Category, NewCategory};
use crate::domain::progress::{Progress, ProgressUpdate};
use crate::domain::room::{NewRoom, Room};
use crate::domain::types::{CategoryId, ProgressId, RoomId, UserId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, ProgressReader, ProgressWriter, RoomReader, RoomWriter,
};

/// Simple in-memory repository used for unit tests.
///
/// Inserts can be made to fail by category name or room title.
#[derive(Default)]
pub struct TestRepository {
    categories: RefCell<Vec<Category>>,
    rooms: RefCell<Vec<Room>>,
    progress: RefCell<Vec<Progress>>,
    failing_categories: HashSet<String>,
    failing_rooms: HashSet<String>,
    fail_wipe: bool,
    /// Every mutating call in order, e.g. `delete:rooms`.
    pub calls: RefCell<Vec<String>>,
    next_id: Cell<u32>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_category(mut self, name: &str) -> Self {
        self.failing_categories.insert(name.to_string());
        self
    }

    pub fn fail_room(mut self, title: &str) -> Self {
        self.failing_rooms.insert(title.to_string());
        self
    }

    pub fn fail_wipe(mut self) -> Self {
        self.fail_wipe = true;
        self
    }

    pub fn with_progress(self, progress: Vec<Progress>) -> Self {
        *self.progress.borrow_mut() = progress;
        self
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.borrow().clone()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.borrow().clone()
    }

    pub fn progress(&self) -> Vec<Progress> {
        self.progress.borrow().clone()
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{prefix}-{id}")
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn rejected(what: &str) -> RepositoryError {
        RepositoryError::Rejected {
            status: 409,
            body: format!("{what} rejected"),
        }
    }
}

pub fn epoch() -> NaiveDateTime {
    DateTime::from_timestamp(0, 0).unwrap().naive_utc()
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let mut items = self.categories();
        items.sort_by_key(|c| c.display_order);
        Ok(items)
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        self.record(format!("insert:category:{}", category.name));
        if self.failing_categories.contains(category.name.as_str()) {
            return Err(Self::rejected(category.name.as_str()));
        }
        let created = Category {
            id: CategoryId::new(self.next_id("category"))?,
            name: category.name.clone(),
            display_order: category.display_order,
            total_rooms: category.total_rooms,
            created_at: epoch(),
        };
        self.categories.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn delete_all_categories(&self) -> RepositoryResult<usize> {
        self.record("delete:categories");
        Ok(self.categories.take().len())
    }
}

impl RoomReader for TestRepository {
    fn list_rooms(&self) -> RepositoryResult<Vec<Room>> {
        let mut items = self.rooms();
        items.sort_by_key(|r| r.display_order);
        Ok(items)
    }

    fn get_room_by_id(&self, id: &RoomId) -> RepositoryResult<Option<Room>> {
        Ok(self.rooms.borrow().iter().find(|r| &r.id == id).cloned())
    }
}

impl RoomWriter for TestRepository {
    fn create_room(&self, room: &NewRoom) -> RepositoryResult<Room> {
        self.record(format!("insert:room:{}", room.title));
        if self.failing_rooms.contains(room.title.as_str()) {
            return Err(Self::rejected(room.title.as_str()));
        }
        let created = Room {
            id: RoomId::new(self.next_id("room"))?,
            title: room.title.clone(),
            url: room.url.clone(),
            category_id: room.category_id.clone(),
            display_order: room.display_order,
            created_at: epoch(),
        };
        self.rooms.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn delete_all_rooms(&self) -> RepositoryResult<usize> {
        self.record("delete:rooms");
        Ok(self.rooms.take().len())
    }
}

impl ProgressReader for TestRepository {
    fn list_progress(&self, user_id: &UserId) -> RepositoryResult<Vec<Progress>> {
        Ok(self
            .progress
            .borrow()
            .iter()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_progress(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> RepositoryResult<Option<Progress>> {
        Ok(self
            .progress
            .borrow()
            .iter()
            .find(|p| &p.user_id == user_id && &p.room_id == room_id)
            .cloned())
    }
}

impl ProgressWriter for TestRepository {
    fn upsert_progress(&self, update: &ProgressUpdate) -> RepositoryResult<Progress> {
        self.record(format!("upsert:progress:{}", update.room_id));
        let mut progress = self.progress.borrow_mut();
        if let Some(existing) = progress
            .iter_mut()
            .find(|p| p.user_id == update.user_id && p.room_id == update.room_id)
        {
            existing.completed = update.completed;
            existing.completed_at = update.completed_at;
            return Ok(existing.clone());
        }
        let created = Progress {
            id: ProgressId::new(self.next_id("progress"))?,
            user_id: update.user_id.clone(),
            room_id: update.room_id.clone(),
            completed: update.completed,
            completed_at: update.completed_at,
            created_at: epoch(),
        };
        progress.push(created.clone());
        Ok(created)
    }

    fn delete_all_progress(&self) -> RepositoryResult<usize> {
        self.record("delete:progress");
        if self.fail_wipe {
            return Err(Self::rejected("delete"));
        }
        Ok(self.progress.take().len())
    }
}

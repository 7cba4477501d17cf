use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::progress::{Progress, ProgressUpdate};
use crate::domain::room::{NewRoom, Room};
use crate::domain::types::{RoomId, UserId};

use self::errors::RepositoryResult;

pub mod category;
pub mod errors;
pub mod progress;
pub mod rest;
pub mod room;
#[cfg(test)]
pub mod test;

pub use self::rest::RestRepository;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category ordered by `display_order`.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return the stored row.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Delete every category.
    fn delete_all_categories(&self) -> RepositoryResult<usize>;
}

/// Read-only operations for room entities.
pub trait RoomReader {
    /// List every room ordered by `display_order`.
    fn list_rooms(&self) -> RepositoryResult<Vec<Room>>;
    /// Retrieve a room by its identifier.
    fn get_room_by_id(&self, id: &RoomId) -> RepositoryResult<Option<Room>>;
}

/// Write operations for room entities.
pub trait RoomWriter {
    /// Persist a new room and return the stored row.
    fn create_room(&self, room: &NewRoom) -> RepositoryResult<Room>;
    /// Delete every room.
    fn delete_all_rooms(&self) -> RepositoryResult<usize>;
}

/// Read-only operations for progress records.
pub trait ProgressReader {
    /// List all progress records of a user.
    fn list_progress(&self, user_id: &UserId) -> RepositoryResult<Vec<Progress>>;
    /// Retrieve the progress record of a user for one room.
    fn get_progress(&self, user_id: &UserId, room_id: &RoomId)
    -> RepositoryResult<Option<Progress>>;
}

/// Write operations for progress records.
pub trait ProgressWriter {
    /// Insert or update the single record for `(user_id, room_id)`.
    fn upsert_progress(&self, update: &ProgressUpdate) -> RepositoryResult<Progress>;
    /// Delete every progress record of every user.
    fn delete_all_progress(&self) -> RepositoryResult<usize>;
}

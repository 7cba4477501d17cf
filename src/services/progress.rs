use std::collections::{HashMap, HashSet};

use chrono::Utc;
use log::error;

use crate::domain::progress::{Progress, ProgressUpdate};
use crate::domain::room::Room;
use crate::domain::types::{RoomId, UserId};
use crate::dto::checklist::{CategoryProgressDto, ChecklistDto, RoomProgressDto};
use crate::repository::{CategoryReader, ProgressReader, ProgressWriter, RoomReader};

use super::{ServiceError, ServiceResult};

/// Core logic behind the checklist view.
///
/// Loads categories and rooms in display order and marks every room the
/// user has completed. Repository errors are logged and reported as
/// [`ServiceError::Internal`].
pub fn show_checklist<R>(user_id: &UserId, repo: &R) -> ServiceResult<ChecklistDto>
where
    R: CategoryReader + RoomReader + ProgressReader,
{
    let categories = repo.list_categories().map_err(|e| {
        error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;

    let rooms = repo.list_rooms().map_err(|e| {
        error!("Failed to list rooms: {e}");
        ServiceError::Internal
    })?;

    let completed: HashSet<RoomId> = repo
        .list_progress(user_id)
        .map_err(|e| {
            error!("Failed to list progress for {user_id}: {e}");
            ServiceError::Internal
        })?
        .into_iter()
        .filter(|p| p.completed)
        .map(|p| p.room_id)
        .collect();

    let mut by_category: HashMap<String, Vec<Room>> = HashMap::new();
    for room in rooms {
        by_category
            .entry(room.category_id.as_str().to_string())
            .or_default()
            .push(room);
    }

    let categories = categories
        .into_iter()
        .map(|category| {
            let mut rooms = by_category.remove(category.id.as_str()).unwrap_or_default();
            rooms.sort_by_key(|r| r.display_order);
            let rooms = rooms
                .into_iter()
                .map(|room| {
                    let done = completed.contains(&room.id);
                    RoomProgressDto::new(room, done)
                })
                .collect();
            CategoryProgressDto::new(category, rooms)
        })
        .collect::<Vec<_>>();

    Ok(categories.into())
}

/// Flip the completion state of `room_id` for `user_id`.
///
/// Completing a room stamps the current time; un-completing clears it.
pub fn toggle_room<R>(user_id: &UserId, room_id: &RoomId, repo: &R) -> ServiceResult<Progress>
where
    R: RoomReader + ProgressReader + ProgressWriter,
{
    match repo.get_room_by_id(room_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            error!("Failed to get room: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let was_completed = match repo.get_progress(user_id, room_id) {
        Ok(progress) => progress.is_some_and(|p| p.completed),
        Err(e) => {
            error!("Failed to get progress: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let update = ProgressUpdate::new(
        user_id.clone(),
        room_id.clone(),
        !was_completed,
        Utc::now().naive_utc(),
    );

    repo.upsert_progress(&update).map_err(|e| {
        error!("Failed to save progress for room {room_id}: {e}");
        ServiceError::Internal
    })
}

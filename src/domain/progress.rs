use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ProgressId, RoomId, UserId};

/// Completion state of a room for one user.
///
/// There is at most one record per `(user_id, room_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Progress {
    pub id: ProgressId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Desired completion state written with an upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressUpdate {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
}

impl ProgressUpdate {
    /// Build an update for `completed`, stamping `now` when the room is done.
    pub fn new(user_id: UserId, room_id: RoomId, completed: bool, now: NaiveDateTime) -> Self {
        Self {
            user_id,
            room_id,
            completed,
            completed_at: completed.then_some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn completion_time_only_set_when_completed() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc();
        let user = UserId::new("user-1").unwrap();
        let room = RoomId::new("room-1").unwrap();

        let done = ProgressUpdate::new(user.clone(), room.clone(), true, now);
        assert_eq!(done.completed_at, Some(now));

        let undone = ProgressUpdate::new(user, room, false, now);
        assert_eq!(undone.completed_at, None);
    }
}

use diesel::prelude::*;

use crate::domain::progress::{Progress, ProgressUpdate};
use crate::domain::types::{ProgressId, RoomId, UserId};
use crate::models::progress::{NewProgress, Progress as DbProgress};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProgressReader, ProgressWriter};

impl ProgressReader for DieselRepository {
    fn list_progress(&self, user_id: &UserId) -> RepositoryResult<Vec<Progress>> {
        use crate::schema::user_progress;

        let mut conn = self.conn()?;

        let items = user_progress::table
            .filter(user_progress::user_id.eq(user_id.as_str()))
            .select(DbProgress::as_select())
            .load::<DbProgress>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Progress>, _>>()?;

        Ok(items)
    }

    fn get_progress(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> RepositoryResult<Option<Progress>> {
        use crate::schema::user_progress;

        let mut conn = self.conn()?;

        let progress = user_progress::table
            .filter(user_progress::user_id.eq(user_id.as_str()))
            .filter(user_progress::room_id.eq(room_id.as_str()))
            .select(DbProgress::as_select())
            .first::<DbProgress>(&mut conn)
            .optional()?;

        Ok(progress.map(TryInto::try_into).transpose()?)
    }
}

impl ProgressWriter for DieselRepository {
    fn upsert_progress(&self, update: &ProgressUpdate) -> RepositoryResult<Progress> {
        use crate::schema::user_progress;

        let mut conn = self.conn()?;
        let new_progress = NewProgress::with_id(ProgressId::generate(), update);

        let stored: DbProgress = diesel::insert_into(user_progress::table)
            .values(&new_progress)
            .on_conflict((user_progress::user_id, user_progress::room_id))
            .do_update()
            .set((
                user_progress::completed.eq(update.completed),
                user_progress::completed_at.eq(update.completed_at),
            ))
            .returning(DbProgress::as_returning())
            .get_result(&mut conn)?;

        Ok(stored.try_into()?)
    }

    fn delete_all_progress(&self) -> RepositoryResult<usize> {
        use crate::schema::user_progress;

        let mut conn = self.conn()?;
        let affected = diesel::delete(user_progress::table).execute(&mut conn)?;
        Ok(affected)
    }
}

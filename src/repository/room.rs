use diesel::prelude::*;

use crate::domain::room::{NewRoom, Room};
use crate::domain::types::RoomId;
use crate::models::room::{NewRoom as DbNewRoom, Room as DbRoom};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, RoomReader, RoomWriter};

impl RoomReader for DieselRepository {
    fn list_rooms(&self) -> RepositoryResult<Vec<Room>> {
        use crate::schema::rooms;

        let mut conn = self.conn()?;

        let items = rooms::table
            .order(rooms::display_order.asc())
            .select(DbRoom::as_select())
            .load::<DbRoom>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Room>, _>>()?;

        Ok(items)
    }

    fn get_room_by_id(&self, id: &RoomId) -> RepositoryResult<Option<Room>> {
        use crate::schema::rooms;

        let mut conn = self.conn()?;

        let room = rooms::table
            .filter(rooms::id.eq(id.as_str()))
            .select(DbRoom::as_select())
            .first::<DbRoom>(&mut conn)
            .optional()?;

        Ok(room.map(TryInto::try_into).transpose()?)
    }
}

impl RoomWriter for DieselRepository {
    fn create_room(&self, room: &NewRoom) -> RepositoryResult<Room> {
        use crate::schema::rooms;

        let mut conn = self.conn()?;
        let db_room = DbNewRoom::with_id(RoomId::generate(), room);

        let created: DbRoom = diesel::insert_into(rooms::table)
            .values(&db_room)
            .returning(DbRoom::as_returning())
            .get_result(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn delete_all_rooms(&self) -> RepositoryResult<usize> {
        use crate::schema::rooms;

        let mut conn = self.conn()?;
        let affected = diesel::delete(rooms::table).execute(&mut conn)?;
        Ok(affected)
    }
}

//! Store implementation talking to a hosted PostgREST endpoint.
//!
//! Every call is a single blocking request. Filters follow PostgREST query
//! syntax (`column=op.value`).

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, NewCategory};
use crate::domain::progress::{Progress, ProgressUpdate};
use crate::domain::room::{NewRoom, Room};
use crate::domain::types::{
    CategoryId, CategoryName, ProgressId, RoomId, RoomTitle, RoomUrl, TypeConstraintError, UserId,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, ProgressReader, ProgressWriter, RoomReader, RoomWriter,
};

const REST_PATH: &str = "rest/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Matches every row: no real identity equals the nil UUID.
const MATCH_ALL_FILTER: (&str, &str) = ("id", "neq.00000000-0000-0000-0000-000000000000");

const RETURN_ROWS: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";
const PROGRESS_CONFLICT: (&str, &str) = ("on_conflict", "user_id,room_id");
const BY_DISPLAY_ORDER: (&str, &str) = ("order", "display_order.asc");

const CATEGORIES: &str = "categories";
const ROOMS: &str = "rooms";
const PROGRESS: &str = "user_progress";

/// HTTP client for a hosted checklist store.
pub struct RestRepository {
    http: Client,
    base_url: String,
    auth: HeaderMap,
}

impl RestRepository {
    /// Build a client for `base_url`, authenticating every request with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> RepositoryResult<Self> {
        let mut auth = HeaderMap::new();
        auth.insert("apikey", header_value(api_key)?);
        auth.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/{REST_PATH}/{table}", self.base_url)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(table))
            .headers(self.auth.clone())
    }

    fn select_request(&self, table: &str, query: &[(&str, &str)]) -> RequestBuilder {
        self.request(Method::GET, table)
            .query(&[("select", "*")])
            .query(query)
    }

    fn insert_request<B: Serialize>(
        &self,
        table: &str,
        query: &[(&str, &str)],
        prefer: &str,
        body: &B,
    ) -> RequestBuilder {
        self.request(Method::POST, table)
            .query(query)
            .header("Prefer", prefer)
            .json(body)
    }

    fn delete_all_request(&self, table: &str) -> RequestBuilder {
        self.request(Method::DELETE, table)
            .query(&[MATCH_ALL_FILTER, ("select", "id")])
            .header("Prefer", RETURN_ROWS)
    }

    fn upsert_progress_request(&self, update: &ProgressUpdate) -> RequestBuilder {
        let body = ProgressUpsert {
            user_id: update.user_id.as_str(),
            room_id: update.room_id.as_str(),
            completed: update.completed,
            completed_at: update.completed_at.map(|at| at.and_utc()),
        };
        self.insert_request(PROGRESS, &[PROGRESS_CONFLICT], MERGE_DUPLICATES, &body)
    }

    fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> RepositoryResult<Vec<T>> {
        decode(send(self.select_request(table, query))?)
    }

    fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> RepositoryResult<T> {
        let request = self.insert_request(table, &[], RETURN_ROWS, body);
        single_row(table, decode(send(request)?)?)
    }

    fn delete_all(&self, table: &str) -> RepositoryResult<usize> {
        let deleted: Vec<IgnoredAny> = decode(send(self.delete_all_request(table))?)?;
        Ok(deleted.len())
    }
}

fn header_value(value: &str) -> RepositoryResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| RepositoryError::ValidationError("store key is not a valid header".into()))
}

fn send(request: RequestBuilder) -> RepositoryResult<Response> {
    let response = request.send()?;
    match response.status() {
        status if status.is_success() => Ok(response),
        status => Err(rejection(status, response.text().unwrap_or_default())),
    }
}

fn rejection(status: StatusCode, body: String) -> RepositoryError {
    RepositoryError::Rejected {
        status: status.as_u16(),
        body,
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
    let text = response.text()?;
    serde_json::from_str(&text).map_err(|e| RepositoryError::Decode(e.to_string()))
}

/// Inserts ask for the created row back; anything but exactly one is an error.
fn single_row<T>(table: &str, mut rows: Vec<T>) -> RepositoryResult<T> {
    match rows.len() {
        1 => Ok(rows.remove(0)),
        n => Err(RepositoryError::Decode(format!(
            "expected one {table} row, got {n}"
        ))),
    }
}

fn eq_filter(value: &str) -> String {
    format!("eq.{value}")
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: String,
    name: String,
    display_order: i32,
    total_rooms: i32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct CategoryInsert<'a> {
    name: &'a str,
    display_order: i32,
    total_rooms: i32,
}

#[derive(Debug, Deserialize)]
struct RoomRow {
    id: String,
    title: String,
    url: String,
    category_id: String,
    display_order: i32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct RoomInsert<'a> {
    title: &'a str,
    url: &'a str,
    category_id: &'a str,
    display_order: i32,
}

#[derive(Debug, Deserialize)]
struct ProgressRow {
    id: String,
    user_id: String,
    room_id: String,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ProgressUpsert<'a> {
    user_id: &'a str,
    room_id: &'a str,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = TypeConstraintError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(row.id)?,
            name: CategoryName::new(row.name)?,
            display_order: row.display_order.try_into()?,
            total_rooms: row.total_rooms.try_into()?,
            created_at: row.created_at.naive_utc(),
        })
    }
}

impl TryFrom<RoomRow> for Room {
    type Error = TypeConstraintError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoomId::new(row.id)?,
            title: RoomTitle::new(row.title)?,
            url: RoomUrl::new(row.url)?,
            category_id: CategoryId::new(row.category_id)?,
            display_order: row.display_order.try_into()?,
            created_at: row.created_at.naive_utc(),
        })
    }
}

impl TryFrom<ProgressRow> for Progress {
    type Error = TypeConstraintError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProgressId::new(row.id)?,
            user_id: UserId::new(row.user_id)?,
            room_id: RoomId::new(row.room_id)?,
            completed: row.completed,
            completed_at: row.completed_at.map(|at| at.naive_utc()),
            created_at: row.created_at.naive_utc(),
        })
    }
}

impl CategoryReader for RestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = self.select(CATEGORIES, &[BY_DISPLAY_ORDER])?;
        Ok(rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?)
    }
}

impl CategoryWriter for RestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let body = CategoryInsert {
            name: category.name.as_str(),
            display_order: category.display_order.get(),
            total_rooms: category.total_rooms.get(),
        };
        let row: CategoryRow = self.insert(CATEGORIES, &body)?;
        Ok(row.try_into()?)
    }

    fn delete_all_categories(&self) -> RepositoryResult<usize> {
        self.delete_all(CATEGORIES)
    }
}

impl RoomReader for RestRepository {
    fn list_rooms(&self) -> RepositoryResult<Vec<Room>> {
        let rows: Vec<RoomRow> = self.select(ROOMS, &[BY_DISPLAY_ORDER])?;
        Ok(rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Room>, _>>()?)
    }

    fn get_room_by_id(&self, id: &RoomId) -> RepositoryResult<Option<Room>> {
        let filter = eq_filter(id.as_str());
        let rows: Vec<RoomRow> = self.select(ROOMS, &[("id", filter.as_str())])?;
        Ok(rows.into_iter().next().map(TryInto::try_into).transpose()?)
    }
}

impl RoomWriter for RestRepository {
    fn create_room(&self, room: &NewRoom) -> RepositoryResult<Room> {
        let body = RoomInsert {
            title: room.title.as_str(),
            url: room.url.as_str(),
            category_id: room.category_id.as_str(),
            display_order: room.display_order.get(),
        };
        let row: RoomRow = self.insert(ROOMS, &body)?;
        Ok(row.try_into()?)
    }

    fn delete_all_rooms(&self) -> RepositoryResult<usize> {
        self.delete_all(ROOMS)
    }
}

impl ProgressReader for RestRepository {
    fn list_progress(&self, user_id: &UserId) -> RepositoryResult<Vec<Progress>> {
        let filter = eq_filter(user_id.as_str());
        let rows: Vec<ProgressRow> = self.select(PROGRESS, &[("user_id", filter.as_str())])?;
        Ok(rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Progress>, _>>()?)
    }

    fn get_progress(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> RepositoryResult<Option<Progress>> {
        let user_filter = eq_filter(user_id.as_str());
        let room_filter = eq_filter(room_id.as_str());
        let rows: Vec<ProgressRow> = self.select(
            PROGRESS,
            &[
                ("user_id", user_filter.as_str()),
                ("room_id", room_filter.as_str()),
            ],
        )?;
        Ok(rows.into_iter().next().map(TryInto::try_into).transpose()?)
    }
}

impl ProgressWriter for RestRepository {
    fn upsert_progress(&self, update: &ProgressUpdate) -> RepositoryResult<Progress> {
        let request = self.upsert_progress_request(update);
        let row: ProgressRow = single_row(PROGRESS, decode(send(request)?)?)?;
        Ok(row.try_into()?)
    }

    fn delete_all_progress(&self) -> RepositoryResult<usize> {
        self.delete_all(PROGRESS)
    }
}

//! Replace the stored checklist with the contents of a markdown document.
//!
//! The store is wiped first (progress, rooms, categories) and then refilled
//! row by row. A failed delete or insert is logged and recorded in the
//! [`SeedReport`]; it never aborts the run.

use std::path::Path;

use log::{error, info};
use serde::Serialize;

use crate::checklist::{ParsedCategory, ParsedRoom, parse_checklist};
use crate::domain::category::NewCategory;
use crate::domain::room::NewRoom;
use crate::domain::types::{
    CategoryId, CategoryName, DisplayOrder, RoomCount, RoomTitle, RoomUrl, TypeConstraintError,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryWriter, ProgressWriter, RoomWriter};

use super::{ServiceError, ServiceResult};

/// Which step of the run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedRowKind {
    /// Clearing one table before inserting.
    Wipe,
    Category,
    Room,
}

/// Non-fatal failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedRowError {
    pub kind: SeedRowKind,
    /// Table name, category name or room title.
    pub name: String,
    pub message: String,
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Categories found in the document.
    pub categories: usize,
    /// Rooms found in the document.
    pub rooms_parsed: usize,
    pub categories_inserted: usize,
    pub rooms_inserted: usize,
    pub errors: Vec<SeedRowError>,
}

impl SeedReport {
    fn for_document(categories: &[ParsedCategory]) -> Self {
        Self {
            categories: categories.len(),
            rooms_parsed: categories.iter().map(ParsedCategory::total_rooms).sum(),
            ..Self::default()
        }
    }

    fn push_error(&mut self, kind: SeedRowKind, name: &str, message: impl Into<String>) {
        self.errors.push(SeedRowError {
            kind,
            name: name.to_string(),
            message: message.into(),
        });
    }
}

/// Read and parse the checklist document at `path`.
pub fn load_checklist(path: &Path) -> ServiceResult<Vec<ParsedCategory>> {
    info!("Reading {}...", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        error!("Failed to read {}: {e}", path.display());
        ServiceError::SourceRead {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })?;

    info!("Parsing categories and rooms...");
    let categories = parse_checklist(&content);
    info!("Found {} categories", categories.len());
    Ok(categories)
}

/// Read the document at `path` and seed it into `repo`.
pub fn seed_from_path<R>(path: &Path, repo: &R) -> ServiceResult<SeedReport>
where
    R: CategoryWriter + RoomWriter + ProgressWriter,
{
    let categories = load_checklist(path)?;
    seed_checklist(&categories, repo)
}

/// Wipe the store and insert `categories` with their rooms.
pub fn seed_checklist<R>(categories: &[ParsedCategory], repo: &R) -> ServiceResult<SeedReport>
where
    R: CategoryWriter + RoomWriter + ProgressWriter,
{
    let mut report = SeedReport::for_document(categories);

    clear_existing(repo, &mut report);

    info!("Seeding categories...");
    for category in categories {
        let new_category = match to_new_category(category) {
            Ok(new_category) => new_category,
            Err(e) => {
                error!("Invalid category {}: {e}", category.name);
                report.push_error(SeedRowKind::Category, &category.name, e.to_string());
                continue;
            }
        };

        let created = match repo.create_category(&new_category) {
            Ok(created) => created,
            Err(e) => {
                error!("Error inserting category {}: {e}", category.name);
                report.push_error(SeedRowKind::Category, &category.name, e.to_string());
                continue;
            }
        };
        report.categories_inserted += 1;

        info!(
            "Seeding {} rooms for {}...",
            category.total_rooms(),
            category.name
        );
        for room in &category.rooms {
            if seed_room(room, &created.id, repo, &mut report) {
                report.rooms_inserted += 1;
            }
        }
    }

    info!("Database seeded successfully!");
    info!("Total categories: {}", report.categories);
    info!("Total rooms: {}", report.rooms_parsed);
    if !report.errors.is_empty() {
        info!("{} operation(s) failed", report.errors.len());
    }

    Ok(report)
}

/// Progress rows reference rooms and rooms reference categories, so they go
/// in that order. Every delete is attempted even if an earlier one failed.
fn clear_existing<R>(repo: &R, report: &mut SeedReport)
where
    R: CategoryWriter + RoomWriter + ProgressWriter,
{
    info!("Clearing existing data...");
    clear_table("progress", repo.delete_all_progress(), report);
    clear_table("rooms", repo.delete_all_rooms(), report);
    clear_table("categories", repo.delete_all_categories(), report);
}

fn clear_table(table: &str, result: RepositoryResult<usize>, report: &mut SeedReport) {
    match result {
        Ok(removed) => info!("Removed {removed} rows from {table}"),
        Err(e) => {
            error!("Error clearing {table}: {e}");
            report.push_error(SeedRowKind::Wipe, table, e.to_string());
        }
    }
}

fn seed_room<R>(
    room: &ParsedRoom,
    category_id: &CategoryId,
    repo: &R,
    report: &mut SeedReport,
) -> bool
where
    R: RoomWriter,
{
    let new_room = match to_new_room(room, category_id) {
        Ok(new_room) => new_room,
        Err(e) => {
            error!("Invalid room {}: {e}", room.title);
            report.push_error(SeedRowKind::Room, &room.title, e.to_string());
            return false;
        }
    };

    match repo.create_room(&new_room) {
        Ok(_) => true,
        Err(e) => {
            error!("Error inserting room {}: {e}", room.title);
            report.push_error(SeedRowKind::Room, &room.title, e.to_string());
            false
        }
    }
}

fn to_new_category(category: &ParsedCategory) -> Result<NewCategory, TypeConstraintError> {
    Ok(NewCategory {
        name: CategoryName::new(category.name.as_str())?,
        display_order: DisplayOrder::new(category.display_order)?,
        total_rooms: RoomCount::try_from(category.total_rooms())?,
    })
}

fn to_new_room(
    room: &ParsedRoom,
    category_id: &CategoryId,
) -> Result<NewRoom, TypeConstraintError> {
    Ok(NewRoom {
        title: RoomTitle::new(room.title.as_str())?,
        url: RoomUrl::new(room.url.as_str())?,
        category_id: category_id.clone(),
        display_order: DisplayOrder::new(room.display_order)?,
    })
}

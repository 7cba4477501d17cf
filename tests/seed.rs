use std::io::Write;

use room_tracker::repository::{CategoryReader, DieselRepository, RoomReader};
use room_tracker::services::seed::seed_from_path;
use tempfile::NamedTempFile;

mod common;

const README: &str = "\
# TryHackMe rooms

Work through these in order.

## Intro Rooms
- [ ] [TryHackMe | Tutorial](https://tryhackme.com/room/tutorial)
- [x] [Already done elsewhere](https://tryhackme.com/room/done)
- [ ] [TryHackMe | Starting Out In Cyber Sec](https://tryhackme.com/room/startingoutincybersec)

## Recon
- [ ] [Nmap](https://tryhackme.com/room/furthernmap)

## Something New
- [ ] [Custom Room](https://example.com/custom)
";

fn readme_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write checklist");
    file
}

#[test]
fn seeds_checklist_document_into_sqlite() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let readme = readme_file(README);

    let report = seed_from_path(readme.path(), &repo).expect("seeding should succeed");

    assert_eq!(report.categories, 3);
    assert_eq!(report.rooms_parsed, 4);
    assert_eq!(report.categories_inserted, 3);
    assert_eq!(report.rooms_inserted, 4);
    assert!(report.errors.is_empty());

    let categories = repo.list_categories().expect("should list categories");
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Introductory Rooms", "Reconnaissance", "Something New"]);
    assert_eq!(categories[0].total_rooms, 2);

    let rooms = repo.list_rooms().expect("should list rooms");
    let intro: Vec<(&str, i32)> = rooms
        .iter()
        .filter(|r| r.category_id == categories[0].id)
        .map(|r| (r.title.as_str(), r.display_order.get()))
        .collect();
    assert_eq!(
        intro,
        vec![("Tutorial", 1), ("Starting Out In Cyber Sec", 2)]
    );
}

#[test]
fn reseeding_replaces_previous_rows() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let readme = readme_file(README);

    seed_from_path(readme.path(), &repo).expect("first seed should succeed");
    let first_ids: Vec<String> = repo
        .list_categories()
        .expect("should list categories")
        .into_iter()
        .map(|c| c.id.into_inner())
        .collect();

    seed_from_path(readme.path(), &repo).expect("second seed should succeed");
    let categories = repo.list_categories().expect("should list categories");

    assert_eq!(categories.len(), 3);
    assert_eq!(repo.list_rooms().expect("should list rooms").len(), 4);
    assert!(
        categories
            .iter()
            .all(|c| !first_ids.contains(&c.id.as_str().to_string()))
    );
}

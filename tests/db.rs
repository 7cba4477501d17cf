use room_tracker::db::run_pending_migrations;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn migrations_are_idempotent() {
    let test_db = common::TestDb::new();
    assert!(run_pending_migrations(&test_db.pool()).is_ok());
}

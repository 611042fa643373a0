use parts_core::db::migrations::latest_version;
use parts_core::db::open_db_in_memory;
use parts_core::{
    CallContext, Interrupted, PartDraft, PartRepository, RepoError, SqlitePartRepository,
    TimestampError,
};
use rusqlite::Connection;
use std::time::Instant;

#[test]
fn insert_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    let id = repo
        .insert_part(&ctx, &PartDraft::new(7, "VC-001"))
        .unwrap();
    assert!(id > 0);

    let loaded = repo.find_live_part(&ctx, id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.manufacturer_id, 7);
    assert_eq!(loaded.vendor_code, "VC-001");
    assert!(loaded.created_at.seconds > 0);
}

#[test]
fn ids_are_monotonic_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    let first = repo.insert_part(&ctx, &PartDraft::new(1, "a")).unwrap();
    let second = repo.insert_part(&ctx, &PartDraft::new(1, "b")).unwrap();
    assert!(second > first);

    // Hard-removing the newest row must not free its id.
    conn.execute("DELETE FROM parts WHERE id = ?1;", [second])
        .unwrap();
    let third = repo.insert_part(&ctx, &PartDraft::new(1, "c")).unwrap();
    assert!(third > second);
}

#[test]
fn update_changes_only_mutable_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    let id = repo.insert_part(&ctx, &PartDraft::new(1, "draft")).unwrap();
    conn.execute("UPDATE parts SET created_at = 1234567890000;", [])
        .unwrap();

    let changed = repo
        .update_live_part(&ctx, id, &PartDraft::new(2, "final"))
        .unwrap();
    assert_eq!(changed, 1);

    let loaded = repo.find_live_part(&ctx, id).unwrap().unwrap();
    assert_eq!(loaded.manufacturer_id, 2);
    assert_eq!(loaded.vendor_code, "final");
    assert_eq!(loaded.created_at.epoch_millis(), 1_234_567_890_000);
}

#[test]
fn update_missing_row_reports_zero_and_never_inserts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    let changed = repo
        .update_live_part(&ctx, 404, &PartDraft::new(1, "ghost"))
        .unwrap();
    assert_eq!(changed, 0);
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn soft_delete_hides_row_but_keeps_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    let kept = repo.insert_part(&ctx, &PartDraft::new(1, "kept")).unwrap();
    let removed = repo.insert_part(&ctx, &PartDraft::new(1, "removed")).unwrap();

    assert_eq!(repo.soft_delete_part(&ctx, removed).unwrap(), 1);
    assert_eq!(repo.soft_delete_part(&ctx, removed).unwrap(), 0);

    assert!(repo.find_live_part(&ctx, removed).unwrap().is_none());
    assert_eq!(
        repo.update_live_part(&ctx, removed, &PartDraft::new(9, "zombie"))
            .unwrap(),
        0
    );

    let live = repo.list_live_parts(&ctx).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, kept);

    assert_eq!(row_count(&conn), 2);
    let deleted_at: Option<i64> = conn
        .query_row("SELECT deleted_at FROM parts WHERE id = ?1;", [removed], |row| {
            row.get(0)
        })
        .unwrap();
    assert!(deleted_at.is_some());
}

#[test]
fn list_is_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    let ids: Vec<_> = ["c", "a", "b"]
        .into_iter()
        .map(|code| repo.insert_part(&ctx, &PartDraft::new(3, code)).unwrap())
        .collect();

    let listed: Vec<_> = repo
        .list_live_parts(&ctx)
        .unwrap()
        .into_iter()
        .map(|part| part.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();

    let parts = repo.list_live_parts(&CallContext::background()).unwrap();
    assert!(parts.is_empty());
}

#[test]
fn invalid_created_at_is_rejected_on_read_paths() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    let id = repo.insert_part(&ctx, &PartDraft::new(1, "bad")).unwrap();
    conn.execute(
        "UPDATE parts SET created_at = ?1 WHERE id = ?2;",
        [i64::MAX, id],
    )
    .unwrap();

    let err = repo.find_live_part(&ctx, id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidTimestamp {
            id: bad_id,
            source: TimestampError::SecondsOutOfRange(_),
        } if bad_id == id
    ));

    let err = repo.list_live_parts(&ctx).unwrap_err();
    assert!(matches!(err, RepoError::InvalidTimestamp { .. }));
}

#[test]
fn wrongly_typed_column_is_a_scan_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();

    repo.insert_part(&ctx, &PartDraft::new(1, "ok")).unwrap();
    conn.execute("UPDATE parts SET created_at = 'yesterday';", [])
        .unwrap();

    let err = repo.list_live_parts(&ctx).unwrap_err();
    assert!(matches!(err, RepoError::RowScan(_)));
}

#[test]
fn cancelled_context_stops_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePartRepository::try_new(&conn).unwrap();
    let ctx = CallContext::background();
    ctx.cancel();

    let err = repo.insert_part(&ctx, &PartDraft::new(1, "x")).unwrap_err();
    assert!(matches!(err, RepoError::Interrupted(Interrupted::Cancelled)));
    assert_eq!(row_count(&conn), 0);

    let expired = CallContext::with_deadline(Instant::now());
    let err = repo.list_live_parts(&expired).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Interrupted(Interrupted::DeadlineExceeded)
    ));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqlitePartRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_parts_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePartRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("parts"))
    ));
}

#[test]
fn repository_rejects_connection_missing_deleted_at_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            manufacturer_id INTEGER NOT NULL,
            vendor_code TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePartRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "parts",
            column: "deleted_at"
        })
    ));
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM parts;", [], |row| row.get(0))
        .unwrap()
}

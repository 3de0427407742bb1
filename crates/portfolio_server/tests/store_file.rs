use portfolio_core::{NewProject, ProjectRepository, SqliteProjectRepository};
use portfolio_server::state::Store;

#[tokio::test]
async fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");

    let store = Store::open(&path).expect("file store should open");
    store
        .run(|conn| SqliteProjectRepository::try_new(conn)?.create_project(&NewProject::new("Kept")))
        .await
        .expect("create should succeed");
    store.close().expect("close should succeed");

    let reopened = Store::open(&path).expect("reopen should succeed");
    let project = reopened
        .run(|conn| SqliteProjectRepository::try_new(conn)?.get_project("Kept"))
        .await
        .expect("project should survive reopen");
    assert_eq!(project.name, "Kept");
    assert!(project.categories.is_empty());
}

#[tokio::test]
async fn close_with_outstanding_handle_is_skipped() {
    let store = Store::in_memory().unwrap();
    let other = store.clone();
    store.close().expect("shared close is a no-op");

    let projects = other
        .run(|conn| SqliteProjectRepository::try_new(conn)?.list_projects())
        .await
        .expect("remaining handle still works");
    assert!(projects.is_empty());
}

use chrono::{TimeZone, Utc};
use portfolio_core::db::open_db_in_memory;
use portfolio_core::{
    CategoryPatch, CategoryService, EntityKind, NewCategory, NewProject, ProjectPatch,
    ProjectService, RepoError, SqliteCategoryRepository, SqliteProjectRepository,
    ValidationError,
};

#[test]
fn create_then_get_returns_matching_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let date = Utc.with_ymd_and_hms(2021, 6, 1, 12, 30, 0).unwrap();

    let created = service
        .create_project(
            &NewProject::new("Alpha")
                .with_description("first project")
                .with_date(date),
        )
        .unwrap();
    let loaded = service.get_project("Alpha").unwrap();

    assert_eq!(created, loaded);
    assert_eq!(loaded.name, "Alpha");
    assert_eq!(loaded.description.as_deref(), Some("first project"));
    assert_eq!(loaded.date, Some(date));
    assert!(loaded.categories.is_empty());
}

#[test]
fn create_with_taken_name_fails_with_duplicate_name() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    projects.create_project(&NewProject::new("Alpha")).unwrap();
    let err = projects
        .create_project(&NewProject::new("Alpha"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateName { kind: EntityKind::Project, ref name } if name == "Alpha"
    ));

    categories.create_category(&NewCategory::new("Beta")).unwrap();
    let err = categories
        .create_category(&NewCategory::new("Beta"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateName {
            kind: EntityKind::Category,
            ..
        }
    ));
}

#[test]
fn create_with_blank_name_fails_validation() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());

    let err = projects.create_project(&NewProject::new("  ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyName(EntityKind::Project))
    ));
    assert!(projects.list_projects().unwrap().is_empty());
}

#[test]
fn get_unknown_name_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    assert!(matches!(
        projects.get_project("missing").unwrap_err(),
        RepoError::NotFound {
            kind: EntityKind::Project,
            ..
        }
    ));
    assert!(matches!(
        categories.get_category("missing").unwrap_err(),
        RepoError::NotFound {
            kind: EntityKind::Category,
            ..
        }
    ));
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    for name in ["Zeta", "Alpha", "Mid"] {
        projects.create_project(&NewProject::new(name)).unwrap();
    }

    let names: Vec<String> = projects
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.name)
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn empty_patch_leaves_every_field_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let date = Utc.with_ymd_and_hms(2019, 3, 4, 0, 0, 0).unwrap();
    let created = projects
        .create_project(&NewProject::new("Alpha").with_description("d").with_date(date))
        .unwrap();

    let updated = projects
        .update_project("Alpha", &ProjectPatch::default())
        .unwrap();
    assert_eq!(updated, created);
}

#[test]
fn description_patch_changes_only_description() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let date = Utc.with_ymd_and_hms(2019, 3, 4, 0, 0, 0).unwrap();
    projects
        .create_project(&NewProject::new("Alpha").with_description("old").with_date(date))
        .unwrap();

    let patch = ProjectPatch {
        description: Some("new".to_string()),
        ..ProjectPatch::default()
    };
    let updated = projects.update_project("Alpha", &patch).unwrap();

    assert_eq!(updated.name, "Alpha");
    assert_eq!(updated.description.as_deref(), Some("new"));
    assert_eq!(updated.date, Some(date));
    assert_eq!(projects.get_project("Alpha").unwrap(), updated);
}

#[test]
fn rename_moves_the_document_to_the_new_name() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    categories
        .create_category(&NewCategory::new("Web").with_description("frontend"))
        .unwrap();

    let patch = CategoryPatch {
        name: Some("Web Apps".to_string()),
        ..CategoryPatch::default()
    };
    let renamed = categories.update_category("Web", &patch).unwrap();

    assert_eq!(renamed.name, "Web Apps");
    assert_eq!(renamed.description.as_deref(), Some("frontend"));
    assert!(categories.get_category("Web").is_err());
    assert_eq!(categories.get_category("Web Apps").unwrap(), renamed);
}

#[test]
fn rename_onto_existing_name_fails_with_duplicate_name() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    projects.create_project(&NewProject::new("Alpha")).unwrap();
    projects.create_project(&NewProject::new("Beta")).unwrap();

    let patch = ProjectPatch {
        name: Some("Beta".to_string()),
        ..ProjectPatch::default()
    };
    let err = projects.update_project("Alpha", &patch).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateName { .. }));
    assert!(projects.get_project("Alpha").is_ok());
}

#[test]
fn update_unknown_name_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    let err = categories
        .update_category("missing", &CategoryPatch::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn delete_returns_removed_document_and_then_not_found() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    projects
        .create_project(&NewProject::new("Alpha").with_description("gone soon"))
        .unwrap();

    let deleted = projects.delete_project("Alpha").unwrap();
    assert_eq!(deleted.description.as_deref(), Some("gone soon"));
    assert!(matches!(
        projects.get_project("Alpha").unwrap_err(),
        RepoError::NotFound { .. }
    ));
    assert!(matches!(
        projects.delete_project("Alpha").unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn documents_serialize_with_list_fields() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let created = categories.create_category(&NewCategory::new("Rust")).unwrap();

    let json = serde_json::to_value(&created).unwrap();
    assert_eq!(json["name"], "Rust");
    assert_eq!(json["projects"], serde_json::json!([]));
    assert!(json.get("description").is_none());
}

//! Contract tests run against every `TaskStore` implementation.
//!
//! Each test body is written once over `&dyn TaskStore`; the `contract!`
//! macro instantiates it for the in-memory list and the SQLite database.

use todo_tasks::db::Database;
use todo_tasks::error::TaskError;
use todo_tasks::store::{MemoryStore, TaskStore};
use todo_tasks::types::{NewTask, TaskUpdate};

fn ids(store: &dyn TaskStore) -> Vec<i64> {
    store.get_all().unwrap().iter().map(|t| t.id).collect()
}

fn ids_increase_from_one_despite_deletes(store: &dyn TaskStore) {
    let a = store.add(NewTask::new("a")).unwrap();
    let b = store.add(NewTask::new("b")).unwrap();
    store.delete(b.id).unwrap();
    let c = store.add(NewTask::new("c")).unwrap();
    store.delete(a.id).unwrap();
    store.delete(c.id).unwrap();
    let d = store.add(NewTask::new("d")).unwrap();

    assert_eq!((a.id, b.id, c.id, d.id), (1, 2, 3, 4));
}

fn blank_titles_create_nothing(store: &dyn TaskStore) {
    for title in ["", "   ", "\t"] {
        let err = store.add(NewTask::new(title)).unwrap_err();
        assert!(matches!(err, TaskError::Validation { .. }), "{:?}", err);
    }
    assert!(store.get_all().unwrap().is_empty());

    // Rejected adds do not consume ids.
    assert_eq!(store.add(NewTask::new("ok")).unwrap().id, 1);
}

fn oversized_input_is_rejected(store: &dyn TaskStore) {
    let err = store.add(NewTask::new("t".repeat(201))).unwrap_err();
    assert_eq!(err.field(), Some("title"));

    let err = store
        .add(NewTask::new("t").with_description("d".repeat(1001)))
        .unwrap_err();
    assert_eq!(err.field(), Some("description"));
}

fn nul_characters_are_rejected_before_storage(store: &dyn TaskStore) {
    let err = store.add(NewTask::new("\0Buy milk")).unwrap_err();
    assert!(matches!(err, TaskError::Validation { .. }), "{:?}", err);
    assert_eq!(err.field(), Some("title"));

    let err = store
        .add(NewTask::new("Buy milk").with_description("semi\0skimmed"))
        .unwrap_err();
    assert_eq!(err.field(), Some("description"));
    assert!(store.get_all().unwrap().is_empty());

    let task = store.add(NewTask::new("Buy milk")).unwrap();
    let err = store
        .update(task.id, TaskUpdate::new().title("\0"))
        .unwrap_err();
    assert!(matches!(err, TaskError::Validation { .. }), "{:?}", err);
    assert_eq!(store.find_by_id(task.id).unwrap().unwrap(), task);
}

fn add_then_find_matches(store: &dyn TaskStore) {
    let created = store
        .add(NewTask::new("Buy milk").with_description("semi-skimmed"))
        .unwrap();
    let found = store.find_by_id(created.id).unwrap().unwrap();

    assert_eq!(found.title, "Buy milk");
    assert_eq!(found.description.as_deref(), Some("semi-skimmed"));
    assert!(!found.completed);
    assert!(found.updated_at.is_none());
    assert_eq!(found, created);
}

fn find_unknown_is_none(store: &dyn TaskStore) {
    assert!(store.find_by_id(1).unwrap().is_none());
    assert!(store.find_by_id(-5).unwrap().is_none());
}

fn empty_title_update_keeps_old_title(store: &dyn TaskStore) {
    let task = store.add(NewTask::new("original")).unwrap();

    for title in ["", "  "] {
        let err = store.update(task.id, TaskUpdate::new().title(title)).unwrap_err();
        assert!(matches!(err, TaskError::Validation { .. }));
    }
    assert_eq!(store.find_by_id(task.id).unwrap().unwrap(), task);
}

fn empty_update_is_a_no_op(store: &dyn TaskStore) {
    let task = store
        .add(NewTask::new("same").with_description("as before"))
        .unwrap();
    let returned = store.update(task.id, TaskUpdate::new()).unwrap();

    assert_eq!(returned, task);
    assert_eq!(store.find_by_id(task.id).unwrap().unwrap(), task);
}

fn update_changes_only_present_fields(store: &dyn TaskStore) {
    let task = store
        .add(NewTask::new("title").with_description("desc"))
        .unwrap();

    let updated = store
        .update(task.id, TaskUpdate::new().title("new title"))
        .unwrap();
    assert_eq!(updated.title, "new title");
    assert_eq!(updated.description.as_deref(), Some("desc"));
    assert!(!updated.completed);
    assert!(updated.updated_at.is_some());

    let updated = store
        .update(task.id, TaskUpdate::new().description(""))
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some(""));
    assert_eq!(updated.title, "new title");

    let updated = store
        .update(task.id, TaskUpdate::new().clear_description().completed(true))
        .unwrap();
    assert_eq!(updated.description, None);
    assert!(updated.completed);

    assert_eq!(store.find_by_id(task.id).unwrap().unwrap(), updated);
}

fn update_unknown_is_not_found(store: &dyn TaskStore) {
    let err = store.update(99, TaskUpdate::new().title("x")).unwrap_err();
    assert!(matches!(err, TaskError::NotFound(99)));
}

fn delete_is_permanent(store: &dyn TaskStore) {
    let task = store.add(NewTask::new("gone soon")).unwrap();
    store.delete(task.id).unwrap();

    assert!(store.find_by_id(task.id).unwrap().is_none());
    assert!(matches!(
        store.delete(task.id).unwrap_err(),
        TaskError::NotFound(id) if id == task.id
    ));
    assert!(matches!(
        store.set_completed(task.id, true).unwrap_err(),
        TaskError::NotFound(_)
    ));
}

fn completion_toggle_round_trips(store: &dyn TaskStore) {
    let task = store
        .add(NewTask::new("toggle").with_description("me"))
        .unwrap();

    let done = store.set_completed(task.id, true).unwrap();
    assert!(done.completed);

    let undone = store.set_completed(task.id, false).unwrap();
    assert!(!undone.completed);
    assert_eq!(undone.title, task.title);
    assert_eq!(undone.description, task.description);
    assert_eq!(undone.created_at, task.created_at);
}

fn snapshot_does_not_alias_store(store: &dyn TaskStore) {
    store.add(NewTask::new("a")).unwrap();
    let mut snapshot = store.get_all().unwrap();
    snapshot[0].title.push_str(" (edited)");
    snapshot.push(snapshot[0].clone());

    let fresh = store.get_all().unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].title, "a");
}

fn list_pages_in_insertion_order(store: &dyn TaskStore) {
    for i in 1..=5 {
        store.add(NewTask::new(format!("task {}", i))).unwrap();
    }
    store.delete(2).unwrap();

    let page: Vec<i64> = store.list(1, 2).unwrap().iter().map(|t| t.id).collect();
    assert_eq!(page, vec![3, 4]);
    assert_eq!(store.list(0, 100).unwrap().len(), 4);
    assert!(store.list(4, 10).unwrap().is_empty());
    assert!(store.list(0, 0).unwrap().is_empty());
}

fn buy_milk_walk_dog_scenario(store: &dyn TaskStore) {
    let milk = store.add(NewTask::new("Buy milk")).unwrap();
    assert_eq!(milk.id, 1);
    assert!(!milk.completed);

    let dog = store.add(NewTask::new("Walk dog")).unwrap();
    assert_eq!(dog.id, 2);

    store.delete(1).unwrap();
    assert_eq!(ids(store), vec![2]);

    let third = store.add(NewTask::new("Water plants")).unwrap();
    assert_eq!(third.id, 3);
    assert_eq!(ids(store), vec![2, 3]);
}

macro_rules! contract {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;

            fn store() -> Box<dyn TaskStore> {
                Box::new($make)
            }

            #[test]
            fn ids_increase_from_one_despite_deletes() {
                super::ids_increase_from_one_despite_deletes(store().as_ref());
            }

            #[test]
            fn blank_titles_create_nothing() {
                super::blank_titles_create_nothing(store().as_ref());
            }

            #[test]
            fn oversized_input_is_rejected() {
                super::oversized_input_is_rejected(store().as_ref());
            }

            #[test]
            fn nul_characters_are_rejected_before_storage() {
                super::nul_characters_are_rejected_before_storage(store().as_ref());
            }

            #[test]
            fn add_then_find_matches() {
                super::add_then_find_matches(store().as_ref());
            }

            #[test]
            fn find_unknown_is_none() {
                super::find_unknown_is_none(store().as_ref());
            }

            #[test]
            fn empty_title_update_keeps_old_title() {
                super::empty_title_update_keeps_old_title(store().as_ref());
            }

            #[test]
            fn empty_update_is_a_no_op() {
                super::empty_update_is_a_no_op(store().as_ref());
            }

            #[test]
            fn update_changes_only_present_fields() {
                super::update_changes_only_present_fields(store().as_ref());
            }

            #[test]
            fn update_unknown_is_not_found() {
                super::update_unknown_is_not_found(store().as_ref());
            }

            #[test]
            fn delete_is_permanent() {
                super::delete_is_permanent(store().as_ref());
            }

            #[test]
            fn completion_toggle_round_trips() {
                super::completion_toggle_round_trips(store().as_ref());
            }

            #[test]
            fn snapshot_does_not_alias_store() {
                super::snapshot_does_not_alias_store(store().as_ref());
            }

            #[test]
            fn list_pages_in_insertion_order() {
                super::list_pages_in_insertion_order(store().as_ref());
            }

            #[test]
            fn buy_milk_walk_dog_scenario() {
                super::buy_milk_walk_dog_scenario(store().as_ref());
            }
        }
    };
}

contract!(memory_store, MemoryStore::new());
contract!(
    sqlite_store,
    Database::open_in_memory().expect("Failed to create in-memory database")
);

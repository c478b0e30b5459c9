#![forbid(unsafe_code)]

use lt_core::ids::AchievementId;
use lt_storage::{
    CreateAchievementRequest, CreateCategoryRequest, NewAchievement, SqliteStore, StoreError,
};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("lt_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn catalog_lists_newest_first() {
    let storage_dir = temp_dir("catalog_lists_newest_first");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    for title in ["Oldest", "Middle", "Newest"] {
        store
            .create_achievement(CreateAchievementRequest {
                title: title.to_string(),
                description: String::new(),
                category_id: None,
                custom_achievement: false,
            })
            .expect("create achievement");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let catalog = store.list_achievements().expect("list achievements");
    let titles: Vec<&str> = catalog.iter().map(|row| row.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
}

#[test]
fn create_achievement_requires_a_known_category() {
    let storage_dir = temp_dir("create_achievement_requires_a_known_category");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let result = store.create_achievement(CreateAchievementRequest {
        title: "Orphan".to_string(),
        description: String::new(),
        category_id: Some("CAT-999".to_string()),
        custom_achievement: false,
    });
    assert!(matches!(result, Err(StoreError::UnknownCategory)));
    assert_eq!(store.count_achievements().expect("count"), 0);
}

#[test]
fn batch_insert_is_all_or_nothing() {
    let storage_dir = temp_dir("batch_insert_is_all_or_nothing");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let category = store
        .create_category(CreateCategoryRequest {
            name: "Health".to_string(),
            description: "Body and mind".to_string(),
            display_order: 1,
        })
        .expect("create category");

    let bad_batch = vec![
        NewAchievement {
            title: "Run 5k".to_string(),
            description: "Run five kilometers".to_string(),
            category_id: Some(category.id.clone()),
        },
        NewAchievement {
            title: "Ghost".to_string(),
            description: String::new(),
            category_id: Some("CAT-404".to_string()),
        },
    ];
    let result = store.insert_achievements_batch(bad_batch);
    assert!(matches!(result, Err(StoreError::UnknownCategory)));
    assert_eq!(
        store.count_achievements().expect("count after failure"),
        0,
        "a failed batch must not leave partial rows"
    );

    let good_batch = vec![
        NewAchievement {
            title: "Run 5k".to_string(),
            description: "Run five kilometers".to_string(),
            category_id: Some(category.id.clone()),
        },
        NewAchievement {
            title: "Sleep 8h".to_string(),
            description: "A full night".to_string(),
            category_id: Some(category.id.clone()),
        },
    ];
    let inserted = store.insert_achievements_batch(good_batch).expect("batch");
    assert_eq!(inserted, 2);
    assert_eq!(store.count_achievements().expect("count"), 2);

    let catalog = store.list_achievements().expect("list achievements");
    assert!(catalog.iter().all(|row| !row.custom_achievement));
}

#[test]
fn empty_batch_is_rejected() {
    let storage_dir = temp_dir("empty_batch_is_rejected");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let result = store.insert_achievements_batch(Vec::new());
    assert!(matches!(result, Err(StoreError::InvalidInput(_))));
}

#[test]
fn delete_achievement_removes_the_row_and_reports_absence() {
    let storage_dir = temp_dir("delete_achievement_removes_the_row_and_reports_absence");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let created = store
        .create_achievement(CreateAchievementRequest {
            title: "Removable".to_string(),
            description: String::new(),
            category_id: None,
            custom_achievement: true,
        })
        .expect("create achievement");

    let id = AchievementId::try_new(created.id).expect("achievement id");
    assert!(store.delete_achievement(&id).expect("delete"));
    assert!(!store.delete_achievement(&id).expect("second delete"));
    assert!(store.get_achievement(&id).expect("get").is_none());
}

#[test]
fn duplicate_category_names_are_rejected() {
    let storage_dir = temp_dir("duplicate_category_names_are_rejected");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    store
        .create_category(CreateCategoryRequest {
            name: "Health".to_string(),
            description: String::new(),
            display_order: 1,
        })
        .expect("create category");

    let result = store.create_category(CreateCategoryRequest {
        name: "Health".to_string(),
        description: "duplicate".to_string(),
        display_order: 2,
    });
    assert!(matches!(result, Err(StoreError::CategoryNameTaken)));
}

#[test]
fn categories_come_back_in_display_order() {
    let storage_dir = temp_dir("categories_come_back_in_display_order");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    for (name, order) in [("Zeta", 2), ("Alpha", 3), ("Mid", 2), ("First", 1)] {
        store
            .create_category(CreateCategoryRequest {
                name: name.to_string(),
                description: String::new(),
                display_order: order,
            })
            .expect("create category");
    }

    let names: Vec<String> = store
        .list_categories()
        .expect("list categories")
        .into_iter()
        .map(|row| row.name)
        .collect();
    assert_eq!(names, vec!["First", "Mid", "Zeta", "Alpha"]);
}

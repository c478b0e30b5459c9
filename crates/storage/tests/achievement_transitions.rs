#![forbid(unsafe_code)]

use lt_core::ids::{AchievementId, UserId};
use lt_storage::{
    AchieveRequest, CreateAchievementRequest, RegisterUserRequest, SqliteStore, StoreError,
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

fn seed_user(store: &mut SqliteStore, user_id: &str) {
    store
        .register_user(RegisterUserRequest {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
        })
        .expect("register user");
}

fn seed_achievement(store: &mut SqliteStore, title: &str) -> String {
    store
        .create_achievement(CreateAchievementRequest {
            title: title.to_string(),
            description: format!("{title} description"),
            category_id: None,
            custom_achievement: false,
        })
        .expect("create achievement")
        .id
}

#[test]
fn repeated_achieve_keeps_exactly_one_row() {
    let storage_dir = temp_dir("repeated_achieve_keeps_exactly_one_row");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_user(&mut store, "user-1");
    let achievement = seed_achievement(&mut store, "First Step");

    let first = store
        .achieve(AchieveRequest {
            user_id: "user-1".to_string(),
            achievement_id: achievement.clone(),
            points_at_achievement: 70,
        })
        .expect("first achieve");
    assert!(first.inserted);
    assert_eq!(first.points_at_achievement, 70);

    // Retry with a different live value: the stored snapshot must win.
    let second = store
        .achieve(AchieveRequest {
            user_id: "user-1".to_string(),
            achievement_id: achievement.clone(),
            points_at_achievement: 60,
        })
        .expect("second achieve");
    assert!(!second.inserted);
    assert_eq!(second.points_at_achievement, 70);
    assert_eq!(second.achieved_at_ms, first.achieved_at_ms);

    let user = UserId::try_new("user-1").expect("user id");
    let completions = store.list_user_completions(&user).expect("list completions");
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].points_at_achievement, 70);
}

#[test]
fn cancel_without_a_row_is_a_no_op() {
    let storage_dir = temp_dir("cancel_without_a_row_is_a_no_op");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_user(&mut store, "user-1");
    let achievement = seed_achievement(&mut store, "First Step");

    let user = UserId::try_new("user-1").expect("user id");
    let achievement_id = AchievementId::try_new(achievement).expect("achievement id");
    let removed = store.cancel(&user, &achievement_id).expect("cancel");
    assert!(!removed);
}

#[test]
fn achieve_then_cancel_restores_the_unachieved_state() {
    let storage_dir = temp_dir("achieve_then_cancel_restores_the_unachieved_state");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_user(&mut store, "user-1");
    let achievement = seed_achievement(&mut store, "First Step");

    store
        .achieve(AchieveRequest {
            user_id: "user-1".to_string(),
            achievement_id: achievement.clone(),
            points_at_achievement: 100,
        })
        .expect("achieve");

    let user = UserId::try_new("user-1").expect("user id");
    let achievement_id = AchievementId::try_new(achievement).expect("achievement id");
    assert!(store.cancel(&user, &achievement_id).expect("cancel"));
    assert!(
        store
            .user_completion_ids(&user)
            .expect("completion ids")
            .is_empty()
    );

    // A second cancel finds nothing and still succeeds.
    assert!(!store.cancel(&user, &achievement_id).expect("second cancel"));
}

#[test]
fn achieve_rejects_unknown_references() {
    let storage_dir = temp_dir("achieve_rejects_unknown_references");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_user(&mut store, "user-1");

    let result = store.achieve(AchieveRequest {
        user_id: "user-1".to_string(),
        achievement_id: "ACH-9999".to_string(),
        points_at_achievement: 10,
    });
    assert!(matches!(result, Err(StoreError::InvalidInput(_))));
}

#[test]
fn completions_list_newest_first_with_frozen_points() {
    let storage_dir = temp_dir("completions_list_newest_first_with_frozen_points");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    seed_user(&mut store, "user-1");
    let first = seed_achievement(&mut store, "First Step");
    let second = seed_achievement(&mut store, "Second Step");

    store
        .achieve(AchieveRequest {
            user_id: "user-1".to_string(),
            achievement_id: first.clone(),
            points_at_achievement: 100,
        })
        .expect("achieve first");
    std::thread::sleep(std::time::Duration::from_millis(5));
    store
        .achieve(AchieveRequest {
            user_id: "user-1".to_string(),
            achievement_id: second.clone(),
            points_at_achievement: 90,
        })
        .expect("achieve second");

    let user = UserId::try_new("user-1").expect("user id");
    let completions = store.list_user_completions(&user).expect("list completions");
    assert_eq!(completions.len(), 2);
    assert_eq!(completions[0].achievement_id, second);
    assert_eq!(completions[0].points_at_achievement, 90);
    assert_eq!(completions[1].achievement_id, first);
    assert_eq!(completions[1].points_at_achievement, 100);
    assert_eq!(completions[1].title, "First Step");
}

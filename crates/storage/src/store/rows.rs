#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub display_order: i64,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchievementRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub custom_achievement: bool,
    pub created_at_ms: i64,
}

/// A completion joined with its achievement, as shown on the personal
/// dashboard. `points_at_achievement` is the frozen snapshot taken when
/// the row was created, not the live point value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserCompletionRow {
    pub achievement_id: String,
    pub title: String,
    pub description: String,
    pub achieved_at_ms: i64,
    pub points_at_achievement: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchievementCount {
    pub achievement_id: String,
    pub completions: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionStats {
    pub per_achievement: Vec<AchievementCount>,
    pub total_users: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchieveOutcome {
    /// False when the (user, achievement) row already existed and the
    /// call was a retry no-op.
    pub inserted: bool,
    pub achieved_at_ms: i64,
    pub points_at_achievement: i64,
}

#![forbid(unsafe_code)]

use crate::ServiceError;
use crate::identity::{IdentityProvider, require_user};
use crate::support::ts_ms_to_rfc3339;
use lt_storage::SqliteStore;
use serde::Serialize;

/// One entry of the viewer's completed list. `points_at_achievement`
/// is the snapshot taken when the achievement was completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletedAchievement {
    pub achievement_id: String,
    pub title: String,
    pub description: String,
    pub achieved_at: String,
    pub points_at_achievement: i64,
}

/// The viewer's completions, newest achieved first.
pub fn user_achievements(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
) -> Result<Vec<CompletedAchievement>, ServiceError> {
    let user = require_user(identity)?;
    let rows = store.list_user_completions(&user)?;
    Ok(rows
        .into_iter()
        .map(|row| CompletedAchievement {
            achievement_id: row.achievement_id,
            title: row.title,
            description: row.description,
            achieved_at: ts_ms_to_rfc3339(row.achieved_at_ms),
            points_at_achievement: row.points_at_achievement,
        })
        .collect())
}

#![forbid(unsafe_code)]

use crate::ServiceError;
use crate::identity::{IdentityProvider, require_user};
use crate::support::ts_ms_to_rfc3339;
use lt_core::confirm::{Confirmation, TransitionKind};
use lt_core::ids::AchievementId;
use lt_core::points::points;
use lt_core::share::share_text;
use lt_storage::{AchieveRequest, SqliteStore};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AchieveReceipt {
    pub achievement_id: String,
    pub title: String,
    /// The value frozen into the completion row. On a retry this is the
    /// original snapshot, not the current live value.
    pub points: i64,
    /// False when the pair was already Achieved and the call was a
    /// retry no-op.
    pub newly_achieved: bool,
    pub achieved_at: String,
    /// Advisory announcement text; transport is the glue layer's job.
    pub share_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CancelReceipt {
    pub achievement_id: String,
    /// False when there was no completion row to remove.
    pub removed: bool,
}

/// Flips (viewer, achievement) to Achieved. The point value is computed
/// from the global statistics at this moment and stored as an immutable
/// snapshot; later rarity changes never rewrite it. Idempotent under
/// retry and duplicate clicks: the storage key keeps the row unique.
pub fn achieve(
    store: &mut SqliteStore,
    identity: &dyn IdentityProvider,
    confirmation: Confirmation,
    achievement_id: &AchievementId,
) -> Result<AchieveReceipt, ServiceError> {
    let user = require_user(identity)?;
    if confirmation.transition() != Some(TransitionKind::Achieve) {
        return Err(ServiceError::ValidationFailed(
            "achieve requires an achieve confirmation".to_string(),
        ));
    }

    let Some(achievement) = store.get_achievement(achievement_id)? else {
        return Err(ServiceError::NotFound("achievement"));
    };

    let stats = store.completion_stats()?;
    let achievement_count = stats
        .per_achievement
        .iter()
        .find(|entry| entry.achievement_id == achievement.id)
        .map(|entry| entry.completions)
        .unwrap_or(0);
    let live_points = points(achievement_count, stats.total_users);

    let outcome = store.achieve(AchieveRequest {
        user_id: user.as_str().to_string(),
        achievement_id: achievement.id.clone(),
        points_at_achievement: live_points,
    })?;

    Ok(AchieveReceipt {
        share_text: share_text(&achievement.title, outcome.points_at_achievement),
        achievement_id: achievement.id,
        title: achievement.title,
        points: outcome.points_at_achievement,
        newly_achieved: outcome.inserted,
        achieved_at: ts_ms_to_rfc3339(outcome.achieved_at_ms),
    })
}

/// Removes the viewer's completion row for the achievement. A missing
/// row reports `removed: false` instead of failing, so retries and
/// duplicate clicks are harmless.
pub fn cancel(
    store: &mut SqliteStore,
    identity: &dyn IdentityProvider,
    confirmation: Confirmation,
    achievement_id: &AchievementId,
) -> Result<CancelReceipt, ServiceError> {
    let user = require_user(identity)?;
    if confirmation.transition() != Some(TransitionKind::Cancel) {
        return Err(ServiceError::ValidationFailed(
            "cancel requires a cancel confirmation".to_string(),
        ));
    }

    let removed = store.cancel(&user, achievement_id)?;
    Ok(CancelReceipt {
        achievement_id: achievement_id.as_str().to_string(),
        removed,
    })
}

#![forbid(unsafe_code)]

use crate::ServiceError;
use crate::identity::{IdentityProvider, require_user};
use lt_core::ids::AchievementId;
use lt_storage::{AchievementRow, CreateAchievementRequest, SqliteStore, StoreError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAchievementInput {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub custom_achievement: bool,
}

pub fn add_achievement(
    store: &mut SqliteStore,
    identity: &dyn IdentityProvider,
    input: NewAchievementInput,
) -> Result<AchievementRow, ServiceError> {
    require_user(identity)?;
    if input.title.trim().is_empty() {
        return Err(ServiceError::ValidationFailed(
            "title must not be empty".to_string(),
        ));
    }
    if input.description.trim().is_empty() {
        return Err(ServiceError::ValidationFailed(
            "description must not be empty".to_string(),
        ));
    }

    store
        .create_achievement(CreateAchievementRequest {
            title: input.title,
            description: input.description,
            category_id: input.category_id,
            custom_achievement: input.custom_achievement,
        })
        .map_err(|err| match err {
            StoreError::UnknownCategory => ServiceError::NotFound("category"),
            other => other.into(),
        })
}

pub fn remove_achievement(
    store: &mut SqliteStore,
    identity: &dyn IdentityProvider,
    achievement_id: &AchievementId,
) -> Result<(), ServiceError> {
    require_user(identity)?;
    if !store.delete_achievement(achievement_id)? {
        return Err(ServiceError::NotFound("achievement"));
    }
    Ok(())
}

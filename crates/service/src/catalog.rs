#![forbid(unsafe_code)]

use crate::ServiceError;
use crate::identity::{IdentityProvider, require_user};
use crate::resolver::CategoryResolver;
use lt_core::points::points;
use lt_storage::SqliteStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Id(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogSort {
    PointsDesc,
    PointsAsc,
    /// Catalog insertion order, newest first.
    Newest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: CategoryFilter,
    pub sort: CatalogSort,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            sort: CatalogSort::PointsDesc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// One catalog entry as presented to the viewer: the achievement, its
/// category, the live rarity-weighted point value, and whether the
/// viewer has completed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoredAchievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: CategoryView,
    pub points: i64,
    pub achieved: bool,
    pub achievement_count: u64,
    pub total_users: u64,
}

/// The viewer's catalog: every achievement with a resolvable category,
/// scored against the current global statistics, filtered and sorted.
/// Read-only; statistics are recomputed on every call and never cached
/// across refreshes.
pub fn catalog_view(
    store: &mut SqliteStore,
    identity: &dyn IdentityProvider,
    query: &CatalogQuery,
) -> Result<Vec<ScoredAchievement>, ServiceError> {
    let user = require_user(identity)?;

    let resolver = CategoryResolver::load(store)?;
    let achievements = store.list_achievements()?;
    // Stats before the viewer's own set, so counts never run ahead of
    // the achieved flags.
    let stats = store.completion_stats()?;
    let completed: HashSet<String> = store.user_completion_ids(&user)?.into_iter().collect();

    let counts: HashMap<String, u64> = stats
        .per_achievement
        .into_iter()
        .map(|entry| (entry.achievement_id, entry.completions))
        .collect();

    let mut items = Vec::new();
    for row in achievements {
        // Rows without a resolvable category are hidden, not errors.
        let Some(category) = row.category_id.as_deref().and_then(|id| resolver.get(id)) else {
            continue;
        };
        match &query.category {
            CategoryFilter::All => {}
            CategoryFilter::Id(wanted) if *wanted == category.id => {}
            CategoryFilter::Id(_) => continue,
        }

        let achievement_count = counts.get(&row.id).copied().unwrap_or(0);
        items.push(ScoredAchievement {
            achieved: completed.contains(&row.id),
            points: points(achievement_count, stats.total_users),
            achievement_count,
            total_users: stats.total_users,
            category: CategoryView {
                id: category.id.clone(),
                name: category.name.clone(),
                description: category.description.clone(),
            },
            id: row.id,
            title: row.title,
            description: row.description,
        });
    }

    // Vec::sort_by is stable, so equal points keep insertion order.
    match query.sort {
        CatalogSort::PointsDesc => items.sort_by(|a, b| b.points.cmp(&a.points)),
        CatalogSort::PointsAsc => items.sort_by(|a, b| a.points.cmp(&b.points)),
        CatalogSort::Newest => {}
    }

    Ok(items)
}

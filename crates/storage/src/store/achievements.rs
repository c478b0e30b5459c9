#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension as _, params};

impl SqliteStore {
    pub fn create_achievement(
        &mut self,
        request: CreateAchievementRequest,
    ) -> Result<AchievementRow, StoreError> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title must not be empty"));
        }
        let category_id = request
            .category_id
            .as_deref()
            .map(canonicalize_category)
            .transpose()?;

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        if let Some(category_id) = category_id.as_deref() {
            ensure_category_exists_tx(&tx, category_id)?;
        }

        let seq = next_counter_tx(&tx, "achievement_seq")?;
        let id = format!("ACH-{:04}", seq);
        tx.execute(
            r#"
            INSERT INTO achievements(id, title, description, category_id, custom_achievement, created_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id,
                title,
                request.description,
                category_id,
                request.custom_achievement,
                now_ms
            ],
        )?;
        tx.commit()?;

        Ok(AchievementRow {
            id,
            title,
            description: request.description,
            category_id,
            custom_achievement: request.custom_achievement,
            created_at_ms: now_ms,
        })
    }

    /// Inserts a bulk catalog load in one transaction. Any failed row
    /// aborts the whole batch; nothing is partially applied.
    pub fn insert_achievements_batch(
        &mut self,
        rows: Vec<NewAchievement>,
    ) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Err(StoreError::InvalidInput("batch must not be empty"));
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let mut inserted = 0u64;
        for row in rows {
            let title = row.title.trim().to_string();
            if title.is_empty() {
                return Err(StoreError::InvalidInput("title must not be empty"));
            }
            let category_id = row
                .category_id
                .as_deref()
                .map(canonicalize_category)
                .transpose()?;
            if let Some(category_id) = category_id.as_deref() {
                ensure_category_exists_tx(&tx, category_id)?;
            }

            let seq = next_counter_tx(&tx, "achievement_seq")?;
            let id = format!("ACH-{:04}", seq);
            tx.execute(
                r#"
                INSERT INTO achievements(id, title, description, category_id, custom_achievement, created_at_ms)
                VALUES (?1, ?2, ?3, ?4, 0, ?5)
                "#,
                params![id, title, row.description, category_id, now_ms],
            )?;
            inserted += 1;
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Removes the achievement and every completion row that points at
    /// it, in one transaction. Returns false when the id is unknown.
    pub fn delete_achievement(
        &mut self,
        achievement_id: &AchievementId,
    ) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM user_achievements WHERE achievement_id = ?1",
            params![achievement_id.as_str()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM achievements WHERE id = ?1",
            params![achievement_id.as_str()],
        )?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    pub fn get_achievement(
        &self,
        achievement_id: &AchievementId,
    ) -> Result<Option<AchievementRow>, StoreError> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, title, description, category_id, custom_achievement, created_at_ms
                FROM achievements
                WHERE id = ?1
                "#,
                params![achievement_id.as_str()],
                achievement_row,
            )
            .optional()?)
    }

    /// Full catalog, newest first (catalog insertion order).
    pub fn list_achievements(&self) -> Result<Vec<AchievementRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, title, description, category_id, custom_achievement, created_at_ms
            FROM achievements
            ORDER BY created_at_ms DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map([], achievement_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_achievements(&self) -> Result<u64, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM achievements", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn achievement_row(row: &rusqlite::Row<'_>) -> Result<AchievementRow, rusqlite::Error> {
    Ok(AchievementRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        custom_achievement: row.get(4)?,
        created_at_ms: row.get(5)?,
    })
}

fn ensure_category_exists_tx(tx: &Transaction<'_>, category_id: &str) -> Result<(), StoreError> {
    let exists = tx
        .query_row(
            "SELECT 1 FROM categories WHERE id = ?1",
            params![category_id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !exists {
        return Err(StoreError::UnknownCategory);
    }
    Ok(())
}

#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;

impl SqliteStore {
    /// Flips a (user, achievement) pair to Achieved. The primary key on
    /// user_achievements is the uniqueness invariant: a concurrent or
    /// repeated call lands on the existing row and reports
    /// `inserted: false` instead of creating a duplicate or failing.
    pub fn achieve(&mut self, request: AchieveRequest) -> Result<AchieveOutcome, StoreError> {
        let user_id = canonicalize_user(&request.user_id)?;
        let achievement_id = canonicalize_achievement(&request.achievement_id)?;

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let insert = tx.execute(
            r#"
            INSERT INTO user_achievements(user_id, achievement_id, achieved_at_ms, points_at_achievement)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, achievement_id) DO NOTHING
            "#,
            params![
                user_id,
                achievement_id,
                now_ms,
                request.points_at_achievement
            ],
        );
        let inserted = match insert {
            Ok(changed) => changed > 0,
            Err(err) => {
                // The upsert swallows the pair conflict, so a constraint
                // failure here means an unknown user or achievement.
                return Err(map_insert_conflict(
                    err,
                    StoreError::InvalidInput("user and achievement must exist"),
                ));
            }
        };

        // Report the row as stored: on a retry the original timestamp
        // and points snapshot win, not the caller's arguments.
        let (achieved_at_ms, points_at_achievement) = tx.query_row(
            r#"
            SELECT achieved_at_ms, points_at_achievement
            FROM user_achievements
            WHERE user_id = ?1 AND achievement_id = ?2
            "#,
            params![user_id, achievement_id],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;
        tx.commit()?;

        Ok(AchieveOutcome {
            inserted,
            achieved_at_ms,
            points_at_achievement,
        })
    }

    /// Deletes the pair's completion row. Returns false (not an error)
    /// when there was nothing to delete.
    pub fn cancel(
        &mut self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM user_achievements WHERE user_id = ?1 AND achievement_id = ?2",
            params![user_id.as_str(), achievement_id.as_str()],
        )?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    pub fn user_completion_ids(&self, user_id: &UserId) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT achievement_id FROM user_achievements WHERE user_id = ?1")?;
        let rows = stmt.query_map(params![user_id.as_str()], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// The user's completions joined with their achievements, newest
    /// achieved first.
    pub fn list_user_completions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserCompletionRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ua.achievement_id, a.title, a.description, ua.achieved_at_ms, ua.points_at_achievement
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = ?1
            ORDER BY ua.achieved_at_ms DESC, ua.achievement_id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![user_id.as_str()], |row| {
            Ok(UserCompletionRow {
                achievement_id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                achieved_at_ms: row.get(3)?,
                points_at_achievement: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

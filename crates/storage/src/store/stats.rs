#![forbid(unsafe_code)]

use super::*;

impl SqliteStore {
    /// Global completion statistics for the catalog view: completions
    /// per achievement as one aggregate query, plus the registered user
    /// count, read inside a single transaction so the two numbers come
    /// from the same snapshot.
    pub fn completion_stats(&mut self) -> Result<CompletionStats, StoreError> {
        let tx = self.conn.transaction()?;

        let per_achievement = {
            let mut stmt = tx.prepare(
                r#"
                SELECT achievement_id, COUNT(*)
                FROM user_achievements
                GROUP BY achievement_id
                ORDER BY achievement_id ASC
                "#,
            )?;
            let rows = stmt.query_map([], |row| {
                let completions: i64 = row.get(1)?;
                Ok(AchievementCount {
                    achievement_id: row.get(0)?,
                    completions: completions.max(0) as u64,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let total_users: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        tx.commit()?;

        Ok(CompletionStats {
            per_achievement,
            total_users: total_users.max(0) as u64,
        })
    }
}

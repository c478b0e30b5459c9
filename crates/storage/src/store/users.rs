#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension as _, params};

impl SqliteStore {
    pub fn register_user(&mut self, request: RegisterUserRequest) -> Result<UserRow, StoreError> {
        let user_id = canonicalize_user(&request.user_id)?;
        let email = request.email.trim().to_string();
        if email.is_empty() {
            return Err(StoreError::InvalidInput("email must not be empty"));
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let insert = tx.execute(
            "INSERT INTO users(id, email, created_at_ms) VALUES (?1, ?2, ?3)",
            params![user_id, email, now_ms],
        );
        if let Err(err) = insert {
            if is_constraint_violation(&err) && constraint_mentions(&err, "users.id") {
                return Err(StoreError::UserExists);
            }
            return Err(map_insert_conflict(err, StoreError::EmailTaken));
        }
        tx.commit()?;

        Ok(UserRow {
            id: user_id,
            email,
            created_at_ms: now_ms,
        })
    }

    pub fn get_user(&self, user_id: &UserId) -> Result<Option<UserRow>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, email, created_at_ms FROM users WHERE id = ?1",
                params![user_id.as_str()],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        created_at_ms: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn count_users(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

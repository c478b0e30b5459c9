#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;

impl SqliteStore {
    pub fn create_category(
        &mut self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryRow, StoreError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("category name must not be empty"));
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let seq = next_counter_tx(&tx, "category_seq")?;
        let id = format!("CAT-{:03}", seq);

        let insert = tx.execute(
            r#"
            INSERT INTO categories(id, name, description, display_order, created_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![id, name, request.description, request.display_order, now_ms],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, StoreError::CategoryNameTaken));
        }
        tx.commit()?;

        Ok(CategoryRow {
            id,
            name,
            description: request.description,
            display_order: request.display_order,
            created_at_ms: now_ms,
        })
    }

    /// All categories in display order. The name tiebreak keeps the
    /// order stable when two categories share a display_order value.
    pub fn list_categories(&self) -> Result<Vec<CategoryRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, description, display_order, created_at_ms
            FROM categories
            ORDER BY display_order ASC, name ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CategoryRow {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                display_order: row.get(3)?,
                created_at_ms: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

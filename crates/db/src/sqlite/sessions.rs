//! SQLite-Implementierung des SessionRepository

use chrono::Utc;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NeueSitzung, SitzungRecord};
use crate::repository::SessionRepository;
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::users::zeit_spalte;
use crate::DbResult;

impl SessionRepository for SqliteDb {
    async fn add(&self, data: NeueSitzung<'_>) -> DbResult<SitzungRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO login_sessions (id, user_id, refresh_token, user_agent, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.user_id)
        .bind(data.refresh_token)
        .bind(data.user_agent)
        .bind(data.expires_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(SitzungRecord {
            id,
            user_id: data.user_id,
            refresh_token: data.refresh_token.to_string(),
            user_agent: data.user_agent.to_string(),
            expires_at: data.expires_at,
            created_at: now,
        })
    }

    async fn remove(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM login_sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn remove_many(&self, ids: &[Uuid]) -> DbResult<u64> {
        if ids.is_empty() {
            return Err(DbError::ParameterFehlen("remove_many ohne Ids".into()));
        }

        let platzhalter = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM login_sessions WHERE id IN ({platzhalter})");

        let mut q = sqlx::query(&sql);
        for id in ids {
            q = q.bind(id.to_string());
        }

        Ok(q.execute(&self.pool).await?.rows_affected())
    }

    async fn get_user_sessions(&self, user_id: i64) -> DbResult<Vec<SitzungRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, refresh_token, user_agent, expires_at, created_at
             FROM login_sessions WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_sitzung).collect()
    }
}

fn row_to_sitzung(row: &sqlx::sqlite::SqliteRow) -> DbResult<SitzungRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID '{id_str}': {e}")))?;

    Ok(SitzungRecord {
        id,
        user_id: row.try_get("user_id")?,
        refresh_token: row.try_get("refresh_token")?,
        user_agent: row.try_get("user_agent")?,
        expires_at: zeit_spalte(row, "expires_at")?,
        created_at: zeit_spalte(row, "created_at")?,
    })
}

//! SQLite-Implementierung des RoleRepository

use sqlx::Row as _;

use crate::error::DbError;
use crate::models::{ClaimRecord, RolleRecord};
use crate::repository::RoleRepository;
use crate::sqlite::pool::SqliteDb;
use crate::DbResult;

impl RoleRepository for SqliteDb {
    async fn exists(&self, name: &str) -> DbResult<bool> {
        let row = sqlx::query("SELECT 1 FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn create(&self, name: &str) -> DbResult<RolleRecord> {
        let ergebnis = sqlx::query("INSERT INTO roles (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("UNIQUE") || msg.contains("unique") {
                    DbError::Eindeutigkeit(format!("Rolle '{name}' existiert bereits"))
                } else {
                    DbError::Sqlx(e)
                }
            })?;

        Ok(RolleRecord {
            id: ergebnis.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn get_by_name(&self, name: &str) -> DbResult<Option<RolleRecord>> {
        let row = sqlx::query("SELECT id, name FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| RolleRecord {
            id: r.get("id"),
            name: r.get("name"),
        }))
    }

    async fn count_by_names(&self, names: &[String]) -> DbResult<i64> {
        if names.is_empty() {
            return Ok(0);
        }

        let platzhalter = vec!["?"; names.len()].join(", ");
        let sql = format!("SELECT COUNT(*) AS anzahl FROM roles WHERE name IN ({platzhalter})");

        let mut q = sqlx::query(&sql);
        for name in names {
            q = q.bind(name);
        }

        let row = q
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::LeeresErgebnis("COUNT(*) auf roles".into()))?;
        Ok(row.try_get("anzahl")?)
    }

    async fn add_claim(&self, role_id: i64, claim_type: &str, claim_value: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO role_claims (role_id, claim_type, claim_value) VALUES (?, ?, ?)")
            .bind(role_id)
            .bind(claim_type)
            .bind(claim_value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_claims(&self, role_id: i64) -> DbResult<Vec<ClaimRecord>> {
        let rows = sqlx::query(
            "SELECT claim_type, claim_value FROM role_claims WHERE role_id = ? ORDER BY id",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| ClaimRecord {
                claim_type: r.get("claim_type"),
                claim_value: r.get("claim_value"),
            })
            .collect())
    }

    async fn add_user_roles(&self, user_id: i64, role_names: &[String]) -> DbResult<()> {
        if role_names.is_empty() {
            return Err(DbError::ParameterFehlen("add_user_roles ohne Rollen".into()));
        }

        // Rollennamen zu Ids aufloesen
        let platzhalter = vec!["?"; role_names.len()].join(", ");
        let sql = format!("SELECT id FROM roles WHERE name IN ({platzhalter})");
        let mut q = sqlx::query(&sql);
        for name in role_names {
            q = q.bind(name);
        }
        let rows = q.fetch_all(&self.pool).await?;

        if rows.len() < role_names.len() {
            return Err(DbError::SchluesselWerteFehlen(format!(
                "{} von {} Rollennamen aufgeloest",
                rows.len(),
                role_names.len()
            )));
        }

        for row in rows {
            let role_id: i64 = row.try_get("id")?;
            sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(role_id)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    async fn get_user_roles(&self, user_id: i64) -> DbResult<Vec<RolleRecord>> {
        let rows = sqlx::query(
            "SELECT r.id, r.name FROM roles r
             INNER JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = ?
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| RolleRecord {
                id: r.get("id"),
                name: r.get("name"),
            })
            .collect())
    }
}

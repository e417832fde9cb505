//! SQLite-Implementierung des UserRepository

use chrono::Utc;

use crate::error::DbError;
use crate::models::{BenutzerFilter, BenutzerRecord, BenutzerUpdate, NeuerBenutzer};
use crate::repository::UserRepository;
use crate::sqlite::pool::SqliteDb;
use crate::DbResult;

const BENUTZER_SPALTEN: &str = "id, username, email, password_hash, security_stamp, phone_number, \
     first_name, middle_name, last_name, is_deleted, deleted_at, created_at, modified_at";

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let ergebnis = sqlx::query(
            "INSERT INTO users (username, email, password_hash, security_stamp, phone_number,
                                first_name, middle_name, last_name, is_deleted, created_at, modified_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.security_stamp)
        .bind(data.phone_number)
        .bind(data.first_name)
        .bind(data.middle_name)
        .bind(data.last_name)
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("unique") {
                DbError::Eindeutigkeit(format!("Benutzername '{}' bereits vergeben", data.username))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(BenutzerRecord {
            id: ergebnis.last_insert_rowid(),
            username: data.username.to_string(),
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            security_stamp: data.security_stamp.to_string(),
            phone_number: data.phone_number.to_string(),
            first_name: data.first_name.to_string(),
            middle_name: data.middle_name.map(str::to_string),
            last_name: data.last_name.to_string(),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            modified_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("SELECT {BENUTZER_SPALTEN} FROM users WHERE id = ? AND is_deleted = 0");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<BenutzerRecord>> {
        let sql =
            format!("SELECT {BENUTZER_SPALTEN} FROM users WHERE username = ? AND is_deleted = 0");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_filter(&self, filter: &BenutzerFilter) -> DbResult<Vec<BenutzerRecord>> {
        let (bedingungen, werte) = filter_bedingungen(filter);

        let mut sql = format!(
            "SELECT {BENUTZER_SPALTEN} FROM users WHERE {} ORDER BY username",
            bedingungen.join(" AND ")
        );
        if filter.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }
        if filter.offset.is_some() {
            sql.push_str(" OFFSET ?");
        }

        let mut q = sqlx::query(&sql);
        for wert in &werte {
            q = q.bind(wert);
        }
        if let Some(limit) = filter.limit {
            q = q.bind(limit);
        }
        if let Some(offset) = filter.offset {
            q = q.bind(offset);
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_benutzer).collect()
    }

    async fn count_by_filter(&self, filter: &BenutzerFilter) -> DbResult<i64> {
        use sqlx::Row as _;

        let (bedingungen, werte) = filter_bedingungen(filter);
        let sql = format!(
            "SELECT COUNT(*) AS anzahl FROM users WHERE {}",
            bedingungen.join(" AND ")
        );

        let mut q = sqlx::query(&sql);
        for wert in &werte {
            q = q.bind(wert);
        }

        let row = q
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::LeeresErgebnis("COUNT(*) auf users".into()))?;
        Ok(row.try_get("anzahl")?)
    }

    async fn update(&self, id: i64, data: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        // Dynamisches UPDATE – nur gesetzte Felder aendern
        let mut sets: Vec<&str> = Vec::new();
        if data.first_name.is_some() {
            sets.push("first_name = ?");
        }
        if data.middle_name.is_some() {
            sets.push("middle_name = ?");
        }
        if data.last_name.is_some() {
            sets.push("last_name = ?");
        }
        if data.phone_number.is_some() {
            sets.push("phone_number = ?");
        }
        if data.password_hash.is_some() {
            sets.push("password_hash = ?");
        }
        if data.security_stamp.is_some() {
            sets.push("security_stamp = ?");
        }

        if sets.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::nicht_gefunden(format!("Benutzer {id}")));
        }
        sets.push("modified_at = ?");

        let sql = format!(
            "UPDATE users SET {} WHERE id = ? AND is_deleted = 0",
            sets.join(", ")
        );
        let mut q = sqlx::query(&sql);

        if let Some(ref v) = data.first_name {
            q = q.bind(v);
        }
        if let Some(ref v) = data.middle_name {
            q = q.bind(v.as_deref());
        }
        if let Some(ref v) = data.last_name {
            q = q.bind(v);
        }
        if let Some(ref v) = data.phone_number {
            q = q.bind(v);
        }
        if let Some(ref v) = data.password_hash {
            q = q.bind(v);
        }
        if let Some(ref v) = data.security_stamp {
            q = q.bind(v);
        }
        q = q.bind(Utc::now().to_rfc3339());
        q = q.bind(id);

        let affected = q.execute(&self.pool).await?.rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Benutzer {id}")));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::intern("Benutzer nach Update nicht gefunden"))
    }

    async fn remove(&self, id: i64) -> DbResult<bool> {
        // Weicher Loeschvorgang: Zeile bleibt erhalten solange Sessions darauf verweisen koennten
        let now = Utc::now().to_rfc3339();
        let affected = sqlx::query(
            "UPDATE users SET is_deleted = 1, deleted_at = ?, modified_at = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(&now)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }
}

/// Baut die WHERE-Bedingungen fuer Filterabfragen (ohne Limit/Offset)
fn filter_bedingungen(filter: &BenutzerFilter) -> (Vec<&'static str>, Vec<String>) {
    let mut bedingungen: Vec<&'static str> = vec!["is_deleted = 0"];
    let mut werte: Vec<String> = Vec::new();

    if let Some(ref username) = filter.username {
        bedingungen.push("username = ?");
        werte.push(username.clone());
    }
    if let Some(ref email) = filter.email {
        bedingungen.push("email = ?");
        werte.push(email.clone());
    }
    if let Some(ref name) = filter.name {
        bedingungen.push("(first_name LIKE ? OR middle_name LIKE ? OR last_name LIKE ?)");
        let muster = format!("%{name}%");
        werte.push(muster.clone());
        werte.push(muster.clone());
        werte.push(muster);
    }
    if let Some(ref phone) = filter.phone_number {
        bedingungen.push("phone_number = ?");
        werte.push(phone.clone());
    }

    (bedingungen, werte)
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let is_deleted: i64 = row.try_get("is_deleted")?;

    Ok(BenutzerRecord {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        security_stamp: row.try_get("security_stamp")?,
        phone_number: row.try_get("phone_number")?,
        first_name: row.try_get("first_name")?,
        middle_name: row.try_get("middle_name")?,
        last_name: row.try_get("last_name")?,
        is_deleted: is_deleted != 0,
        deleted_at: zeit_spalte_optional(row, "deleted_at")?,
        created_at: zeit_spalte(row, "created_at")?,
        modified_at: zeit_spalte(row, "modified_at")?,
    })
}

/// Liest eine RFC3339-Zeitspalte
pub(crate) fn zeit_spalte(
    row: &sqlx::sqlite::SqliteRow,
    spalte: &str,
) -> DbResult<chrono::DateTime<Utc>> {
    use sqlx::Row as _;

    let wert: String = row.try_get(spalte)?;
    chrono::DateTime::parse_from_rfc3339(&wert)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltige {spalte} '{wert}': {e}")))
}

/// Liest eine optionale RFC3339-Zeitspalte
pub(crate) fn zeit_spalte_optional(
    row: &sqlx::sqlite::SqliteRow,
    spalte: &str,
) -> DbResult<Option<chrono::DateTime<Utc>>> {
    use sqlx::Row as _;

    let wert: Option<String> = row.try_get(spalte)?;
    wert.as_deref()
        .map(|s| {
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| DbError::intern(format!("Ungueltige {spalte} '{s}': {e}")))
        })
        .transpose()
}

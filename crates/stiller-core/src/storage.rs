//! SQLite-backed registry of created packs and tracked users.

use std::path::Path;
use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};

use crate::{
    domain::{PackKind, PackRecord, TrackedUser},
    Error, Result,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS packs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    pack_name TEXT NOT NULL,
    pack_title TEXT NOT NULL,
    pack_type TEXT NOT NULL,
    pack_link TEXT NOT NULL,
    sticker_count INTEGER NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(user_id, pack_name)
);

CREATE INDEX IF NOT EXISTS idx_user_id ON packs(user_id);
CREATE INDEX IF NOT EXISTS idx_created_at ON packs(created_at);

CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    username TEXT,
    first_name TEXT,
    last_name TEXT,
    language_code TEXT,
    is_active INTEGER DEFAULT 1,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    last_seen_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_users_last_seen ON users(last_seen_at);
CREATE INDEX IF NOT EXISTS idx_users_is_active ON users(is_active);
"#;

/// Fields of a pack row that the publisher persists after a successful
/// remote publish; `id` and `created_at` are generated by the store.
#[derive(Clone, Debug)]
pub struct NewPack {
    pub owner_id: i64,
    pub name: String,
    pub title: String,
    pub kind: PackKind,
    pub link: String,
    pub item_count: i64,
}

pub struct PackRepository {
    pool: SqlitePool,
}

impl PackRepository {
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(Error::Db)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        Self::with_options(options).await
    }

    /// In-memory database, used by tests.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(Error::Db)?;
        Self::with_options(options).await
    }

    async fn with_options(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Insert a pack row and return its generated id.
    pub async fn create_pack(&self, pack: &NewPack) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO packs (user_id, pack_name, pack_title, pack_type, pack_link, sticker_count)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(pack.owner_id)
        .bind(&pack.name)
        .bind(&pack.title)
        .bind(pack.kind.as_str())
        .bind(&pack.link)
        .bind(pack.item_count)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All packs of one owner, newest first (display layers re-sort as they
    /// see fit).
    pub async fn packs_by_owner(&self, owner_id: i64) -> Result<Vec<PackRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, pack_name, pack_title, pack_type, pack_link, sticker_count, created_at
            FROM packs
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(pack_from_row).collect()
    }

    /// Ownership-scoped point lookup.
    pub async fn pack_by_id(&self, pack_id: i64, owner_id: i64) -> Result<Option<PackRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, pack_name, pack_title, pack_type, pack_link, sticker_count, created_at
            FROM packs
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(pack_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(pack_from_row).transpose()
    }

    /// Delete is ownership-checked: zero affected rows means the pack either
    /// does not exist or belongs to someone else.
    pub async fn delete_pack(&self, pack_id: i64, owner_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM packs WHERE id = ? AND user_id = ?")
            .bind(pack_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFoundOrNotOwned);
        }
        Ok(())
    }

    /// Refresh identity fields and `last_seen_at` on every inbound update.
    pub async fn upsert_user(&self, user: &TrackedUser) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, first_name, last_name, language_code, last_seen_at)
            VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                language_code = excluded.language_code,
                last_seen_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.language_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Users eligible for broadcast, most recently seen first.
    pub async fn active_users(&self) -> Result<Vec<TrackedUser>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, username, first_name, last_name, language_code
            FROM users
            WHERE is_active = 1
            ORDER BY last_seen_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TrackedUser {
                user_id: row.get("user_id"),
                username: row.get("username"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                language_code: row.get("language_code"),
            })
            .collect())
    }

    pub async fn user_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}

fn pack_from_row(row: &SqliteRow) -> Result<PackRecord> {
    let kind_str: String = row.get("pack_type");
    let kind = PackKind::from_str(&kind_str)
        .ok_or_else(|| Error::Platform(format!("unknown pack_type in db: {kind_str}")))?;

    Ok(PackRecord {
        id: row.get("id"),
        owner_id: row.get("user_id"),
        name: row.get("pack_name"),
        title: row.get("pack_title"),
        kind,
        link: row.get("pack_link"),
        item_count: row.get("sticker_count"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_pack(owner: i64, name: &str) -> NewPack {
        NewPack {
            owner_id: owner,
            name: name.to_string(),
            title: name.to_string(),
            kind: PackKind::Sticker,
            link: PackKind::Sticker.public_link(name),
            item_count: 5,
        }
    }

    #[tokio::test]
    async fn create_and_lookup_by_owner() {
        let repo = PackRepository::open_in_memory().await.unwrap();
        let id = repo.create_pack(&new_pack(1, "pack_one")).await.unwrap();
        assert!(id > 0);

        let packs = repo.packs_by_owner(1).await.unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].name, "pack_one");
        assert_eq!(packs[0].item_count, 5);

        let found = repo.pack_by_id(id, 1).await.unwrap();
        assert!(found.is_some());
        // Ownership-scoped: other users do not see the row.
        assert!(repo.pack_by_id(id, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_by_non_owner_fails_and_leaves_row_intact() {
        let repo = PackRepository::open_in_memory().await.unwrap();
        let id = repo.create_pack(&new_pack(1, "pack_one")).await.unwrap();

        let err = repo.delete_pack(id, 999).await.unwrap_err();
        assert!(matches!(err, Error::NotFoundOrNotOwned));
        assert!(repo.pack_by_id(id, 1).await.unwrap().is_some());

        repo.delete_pack(id, 1).await.unwrap();
        assert!(repo.pack_by_id(id, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn owner_and_name_are_unique() {
        let repo = PackRepository::open_in_memory().await.unwrap();
        repo.create_pack(&new_pack(1, "dup")).await.unwrap();
        assert!(repo.create_pack(&new_pack(1, "dup")).await.is_err());
        // Same name under a different owner is fine.
        repo.create_pack(&new_pack(2, "dup")).await.unwrap();
    }

    #[tokio::test]
    async fn upsert_user_is_idempotent_per_id() {
        let repo = PackRepository::open_in_memory().await.unwrap();
        let mut user = TrackedUser {
            user_id: 42,
            username: Some("alice".to_string()),
            ..Default::default()
        };
        repo.upsert_user(&user).await.unwrap();
        user.username = Some("alice_renamed".to_string());
        repo.upsert_user(&user).await.unwrap();

        assert_eq!(repo.user_count().await.unwrap(), 1);
        let users = repo.active_users().await.unwrap();
        assert_eq!(users[0].username.as_deref(), Some("alice_renamed"));
    }
}

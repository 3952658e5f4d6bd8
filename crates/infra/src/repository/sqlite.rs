//! SQLite-backed catalogue (one row per item).

use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use mediashelf_core::{Entity, ItemId};
use mediashelf_inventory::Item;

use super::{ItemRepository, StorageError};

/// Row-oriented catalogue in an `items` table.
///
/// The table is created on first use. A table this repository had to create
/// counts as "nothing persisted yet", so the store seeds it exactly once.
#[derive(Debug)]
pub struct SqliteRepository {
    pool: SqlitePool,
    url: String,
    created_table: AtomicBool,
}

impl SqliteRepository {
    /// Connect to `url` (e.g. `sqlite://library.db?mode=rwc`) and make sure the
    /// `items` table exists.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        // One connection: the store serialises all access anyway, and it keeps
        // `sqlite::memory:` databases coherent.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;

        let existed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'items'",
        )
        .fetch_one(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id     INTEGER PRIMARY KEY,
                type   TEXT NOT NULL,
                title  TEXT NOT NULL,
                author TEXT NULL,
                year   INTEGER NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        if existed == 0 {
            info!(url, "created items table");
        }

        Ok(Self {
            pool,
            url: url.to_string(),
            created_table: AtomicBool::new(existed == 0),
        })
    }
}

fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<Item, StorageError> {
    let raw_id: i64 = row.try_get("id")?;
    let item_type: String = row.try_get("type")?;
    let title: String = row.try_get("title")?;
    let author: Option<String> = row.try_get("author")?;
    let year: Option<i64> = row.try_get("year")?;

    let id = u64::try_from(raw_id)
        .ok()
        .and_then(ItemId::new)
        .ok_or_else(|| StorageError::Corrupt(format!("row has invalid id {raw_id}")))?;

    Item::restore(id, &item_type, &title, author.as_deref(), year)
        .map_err(|e| StorageError::Corrupt(format!("row {raw_id}: {e}")))
}

#[async_trait::async_trait]
impl ItemRepository for SqliteRepository {
    async fn load(&self) -> Result<Option<Vec<Item>>, StorageError> {
        if self.created_table.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }

        let rows = sqlx::query("SELECT id, type, title, author, year FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let items = rows.iter().map(row_to_item).collect::<Result<Vec<_>, _>>()?;
        debug!(count = items.len(), "loaded catalogue rows");
        Ok(Some(items))
    }

    async fn save(&self, items: &[Item]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM items").execute(&mut *tx).await?;

        for item in items {
            let id = i64::try_from(item.id().get())
                .map_err(|_| StorageError::Encode(format!("id {} does not fit a row id", item.id())))?;

            sqlx::query("INSERT INTO items (id, type, title, author, year) VALUES (?, ?, ?, ?, ?)")
                .bind(id)
                .bind(item.item_type().as_str())
                .bind(item.title())
                .bind(item.author())
                .bind(item.year())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.created_table.store(false, Ordering::SeqCst);
        debug!(count = items.len(), "wrote catalogue rows");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediashelf_inventory::seed_catalogue;

    fn db_url(dir: &tempfile::TempDir) -> String {
        format!("sqlite://{}?mode=rwc", dir.path().join("library.db").display())
    }

    #[tokio::test]
    async fn fresh_table_loads_as_nothing_persisted() {
        let repo = SqliteRepository::connect("sqlite::memory:").await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_items() {
        let repo = SqliteRepository::connect("sqlite::memory:").await.unwrap();
        let items = seed_catalogue();

        repo.save(&items).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(items));
    }

    #[tokio::test]
    async fn save_replaces_previous_rows() {
        let repo = SqliteRepository::connect("sqlite::memory:").await.unwrap();
        let items = seed_catalogue();

        repo.save(&items).await.unwrap();
        repo.save(&items[..2]).await.unwrap();
        assert_eq!(repo.load().await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn existing_table_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = db_url(&dir);

        let first = SqliteRepository::connect(&url).await.unwrap();
        first.save(&seed_catalogue()).await.unwrap();
        drop(first);

        let second = SqliteRepository::connect(&url).await.unwrap();
        assert_eq!(second.load().await.unwrap(), Some(seed_catalogue()));
    }

    #[tokio::test]
    async fn empty_existing_table_is_not_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let url = db_url(&dir);

        let first = SqliteRepository::connect(&url).await.unwrap();
        first.save(&[]).await.unwrap();
        drop(first);

        let second = SqliteRepository::connect(&url).await.unwrap();
        assert_eq!(second.load().await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn null_author_loads_as_empty_string() {
        let repo = SqliteRepository::connect("sqlite::memory:").await.unwrap();
        repo.save(&[]).await.unwrap();
        sqlx::query("INSERT INTO items (id, type, title, author, year) VALUES (7, 'film', 'Heat', NULL, NULL)")
            .execute(&repo.pool)
            .await
            .unwrap();

        let items = repo.load().await.unwrap().unwrap();
        assert_eq!(items[0].author(), "");
        assert_eq!(items[0].year(), None);
    }

    #[tokio::test]
    async fn unknown_type_row_is_corrupt() {
        let repo = SqliteRepository::connect("sqlite::memory:").await.unwrap();
        repo.save(&[]).await.unwrap();
        sqlx::query("INSERT INTO items (id, type, title) VALUES (1, 'comic', 'X')")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(repo.load().await.unwrap_err().is_corrupt());
    }
}

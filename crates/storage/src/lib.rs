use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Item, ItemId, ItemStatus, ItemType};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// Fields of a report as accepted by the service, already validated.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub location: String,
    pub contact_name: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimUpdate {
    Claimed,
    AlreadyClaimed,
    Missing,
}

const ITEM_COLUMNS: &str = "id, title, description, item_type, location, \
     contact_name, contact_phone, status, date_reported";

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if database_url.starts_with("sqlite::memory:") {
            // An in-memory database lives and dies with its one connection, so
            // the pool must never reap or recycle it.
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn insert_item(&self, item: &NewItem) -> Result<Item> {
        self.insert_item_reported_at(item, Utc::now()).await
    }

    pub async fn insert_item_reported_at(
        &self,
        item: &NewItem,
        date_reported: DateTime<Utc>,
    ) -> Result<Item> {
        let row = sqlx::query(&format!(
            "INSERT INTO items
                (title, description, item_type, location,
                 contact_name, contact_phone, status, date_reported)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.item_type.as_str())
        .bind(&item.location)
        .bind(&item.contact_name)
        .bind(&item.contact_phone)
        .bind(ItemStatus::Open.as_str())
        .bind(date_reported)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert item")?;
        item_from_row(&row)
    }

    /// Most recently reported first.
    pub async fn list_recent_items(&self, limit: u32) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS}
             FROM items
             ORDER BY date_reported DESC, id DESC
             LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("failed to list items")?;

        rows.iter().map(item_from_row).collect()
    }

    pub async fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"))
            .bind(item_id.0)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load item {item_id}"))?;
        row.as_ref().map(item_from_row).transpose()
    }

    /// Moves an item from OPEN to CLAIMED. Never writes OPEN back.
    pub async fn mark_item_claimed(&self, item_id: ItemId) -> Result<ClaimUpdate> {
        let result = sqlx::query("UPDATE items SET status = ? WHERE id = ? AND status = ?")
            .bind(ItemStatus::Claimed.as_str())
            .bind(item_id.0)
            .bind(ItemStatus::Open.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to claim item {item_id}"))?;

        if result.rows_affected() > 0 {
            return Ok(ClaimUpdate::Claimed);
        }

        match self.get_item(item_id).await? {
            Some(_) => Ok(ClaimUpdate::AlreadyClaimed),
            None => Ok(ClaimUpdate::Missing),
        }
    }
}

fn item_from_row(row: &SqliteRow) -> Result<Item> {
    let item_type: String = row.try_get("item_type")?;
    let status: String = row.try_get("status")?;
    Ok(Item {
        id: ItemId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        item_type: item_type.parse()?,
        location: row.try_get("location")?,
        contact_name: row.try_get("contact_name")?,
        contact_phone: row.try_get("contact_phone")?,
        status: status.parse()?,
        date_reported: row.try_get("date_reported")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

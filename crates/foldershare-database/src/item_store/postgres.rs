//! PostgreSQL entity store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use foldershare_core::error::{AppError, ErrorKind};
use foldershare_core::result::AppResult;
use foldershare_core::types::{FileId, ItemId, UserId};
use foldershare_entity::grants::AccessGrants;
use foldershare_entity::item::{CreateItem, Item, ItemKind};
use foldershare_entity::store::EntityStore;
use foldershare_entity::usage::{UsageDelta, UserUsage};

/// Entity store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgEntityStore {
    pool: PgPool,
}

/// Raw row shape for `foldershare_items`.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    kind: String,
    name: String,
    parent_id: Option<i64>,
    root_id: i64,
    owner_id: i64,
    size: Option<i64>,
    created_at: DateTime<Utc>,
    changed_at: DateTime<Utc>,
    description: String,
    file_id: Option<i64>,
    grants: Option<serde_json::Value>,
    extra: serde_json::Value,
}

impl ItemRow {
    fn into_item(self) -> AppResult<Item> {
        let kind = ItemKind::parse(&self.kind).ok_or_else(|| {
            AppError::database(format!("Unknown entity kind '{}' in row {}", self.kind, self.id))
        })?;
        let grants: Option<AccessGrants> = match self.grants {
            Some(value) => Some(serde_json::from_value(value)?),
            None => None,
        };
        let extra = match self.extra {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Ok(Item {
            id: ItemId(self.id),
            kind,
            name: self.name,
            parent_id: self.parent_id.map(ItemId),
            root_id: ItemId(self.root_id),
            owner_id: UserId(self.owner_id),
            size: self.size,
            created_at: self.created_at,
            changed_at: self.changed_at,
            description: self.description,
            file_id: self.file_id.map(FileId),
            grants,
            extra,
        })
    }
}

/// Raw row shape for `foldershare_usage`.
#[derive(Debug, FromRow)]
struct UsageRow {
    user_id: i64,
    n_root_folders: i64,
    n_folders: i64,
    n_files: i64,
    n_bytes: i64,
}

impl From<UsageRow> for UserUsage {
    fn from(row: UsageRow) -> Self {
        Self {
            user_id: UserId(row.user_id),
            n_root_folders: row.n_root_folders,
            n_folders: row.n_folders,
            n_files: row.n_files,
            n_bytes: row.n_bytes,
        }
    }
}

const ITEM_COLUMNS: &str = "id, kind, name, parent_id, root_id, owner_id, size, \
     created_at, changed_at, description, file_id, grants, extra";

impl PgEntityStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn rows_to_items(rows: Vec<ItemRow>) -> AppResult<Vec<Item>> {
        rows.into_iter().map(ItemRow::into_item).collect()
    }
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM foldershare_items WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find entity", e))?;
        row.map(ItemRow::into_item).transpose()
    }

    async fn find_child_by_name(
        &self,
        parent_id: ItemId,
        name: &str,
    ) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM foldershare_items WHERE parent_id = $1 AND name = $2"
        ))
        .bind(parent_id.0)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find child by name", e)
        })?;
        row.map(ItemRow::into_item).transpose()
    }

    async fn find_root_by_name(&self, owner_id: UserId, name: &str) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM foldershare_items \
             WHERE parent_id IS NULL AND owner_id = $1 AND name = $2"
        ))
        .bind(owner_id.0)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find root by name", e)
        })?;
        row.map(ItemRow::into_item).transpose()
    }

    async fn list_children(&self, parent_id: ItemId) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM foldershare_items \
             WHERE parent_id = $1 ORDER BY name ASC, id ASC"
        ))
        .bind(parent_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))?;
        Self::rows_to_items(rows)
    }

    async fn list_roots(&self, owner_id: UserId) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM foldershare_items \
             WHERE parent_id IS NULL AND owner_id = $1 ORDER BY name ASC, id ASC"
        ))
        .bind(owner_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list root folders", e)
        })?;
        Self::rows_to_items(rows)
    }

    async fn list_all_roots(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM foldershare_items \
             WHERE parent_id IS NULL ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list root folders", e)
        })?;
        Self::rows_to_items(rows)
    }

    async fn list_descendants(&self, id: ItemId) -> AppResult<Vec<Item>> {
        // The sort_path array of (name, id) pairs yields pre-order
        // depth-first with siblings in name order.
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "WITH RECURSIVE tree AS ( \
                SELECT i.*, ARRAY[]::text[] AS sort_path \
                  FROM foldershare_items i WHERE i.id = $1 \
                UNION ALL \
                SELECT c.*, t.sort_path || ARRAY[c.name, lpad(c.id::text, 20, '0')] \
                  FROM foldershare_items c INNER JOIN tree t ON c.parent_id = t.id \
             ) SELECT {ITEM_COLUMNS} FROM tree WHERE id != $1 ORDER BY sort_path ASC"
        ))
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list descendants", e)
        })?;
        Self::rows_to_items(rows)
    }

    async fn list_ancestors(&self, id: ItemId) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "WITH RECURSIVE ancestors AS ( \
                SELECT i.*, 0 AS dist FROM foldershare_items i WHERE i.id = $1 \
                UNION ALL \
                SELECT p.*, a.dist + 1 \
                  FROM foldershare_items p INNER JOIN ancestors a ON p.id = a.parent_id \
             ) SELECT {ITEM_COLUMNS} FROM ancestors ORDER BY dist DESC"
        ))
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list ancestors", e))?;
        if rows.is_empty() {
            return Err(AppError::not_found(format!("Entity {id} not found")));
        }
        Self::rows_to_items(rows)
    }

    async fn count_children(&self, parent_id: ItemId) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM foldershare_items WHERE parent_id = $1")
                .bind(parent_id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count children", e)
                })?;
        Ok(count as u64)
    }

    async fn list_all_items(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM foldershare_items ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list entities", e))?;
        Self::rows_to_items(rows)
    }

    async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        let grants = data
            .grants
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        // Root folders are their own root; the id is only known after the
        // insert, so the row is patched inside one transaction.
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "INSERT INTO foldershare_items \
             (kind, name, parent_id, root_id, owner_id, size, description, file_id, grants, extra) \
             VALUES ($1, $2, $3, COALESCE($4, 0), $5, $6, $7, $8, $9, '{{}}'::jsonb) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(data.kind.as_str())
        .bind(&data.name)
        .bind(data.parent_id.map(|p| p.0))
        .bind(data.root_id.map(|r| r.0))
        .bind(data.owner_id.0)
        .bind(data.size)
        .bind(&data.description)
        .bind(data.file_id.map(|f| f.0))
        .bind(grants)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint().is_some() => {
                AppError::conflict(format!("Entity name '{}' already exists", data.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create entity", e),
        })?;

        let row = if data.root_id.is_none() {
            sqlx::query_as::<_, ItemRow>(&format!(
                "UPDATE foldershare_items SET root_id = id WHERE id = $1 RETURNING {ITEM_COLUMNS}"
            ))
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set root id", e)
            })?
        } else {
            row
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        row.into_item()
    }

    async fn update(&self, item: &Item) -> AppResult<Item> {
        let grants = item
            .grants
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let extra = serde_json::Value::Object(item.extra.clone());

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "UPDATE foldershare_items SET \
               name = $2, parent_id = $3, root_id = $4, owner_id = $5, size = $6, \
               description = $7, file_id = $8, grants = $9, extra = $10, changed_at = NOW() \
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item.id.0)
        .bind(&item.name)
        .bind(item.parent_id.map(|p| p.0))
        .bind(item.root_id.0)
        .bind(item.owner_id.0)
        .bind(item.size)
        .bind(&item.description)
        .bind(item.file_id.map(|f| f.0))
        .bind(grants)
        .bind(extra)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update entity", e))?
        .ok_or_else(|| AppError::not_found(format!("Entity {} not found", item.id)))?;

        row.into_item()
    }

    async fn delete(&self, id: ItemId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM foldershare_items WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete entity", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_usage(&self, user_id: UserId) -> AppResult<UserUsage> {
        let row = sqlx::query_as::<_, UsageRow>(
            "SELECT user_id, n_root_folders, n_folders, n_files, n_bytes \
             FROM foldershare_usage WHERE user_id = $1",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read usage", e))?;
        Ok(row
            .map(UserUsage::from)
            .unwrap_or_else(|| UserUsage::zero(user_id)))
    }

    async fn apply_usage_delta(&self, user_id: UserId, delta: &UsageDelta) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO foldershare_usage \
               (user_id, n_root_folders, n_folders, n_files, n_bytes) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
               n_root_folders = foldershare_usage.n_root_folders + EXCLUDED.n_root_folders, \
               n_folders = foldershare_usage.n_folders + EXCLUDED.n_folders, \
               n_files = foldershare_usage.n_files + EXCLUDED.n_files, \
               n_bytes = foldershare_usage.n_bytes + EXCLUDED.n_bytes",
        )
        .bind(user_id.0)
        .bind(delta.root_folders)
        .bind(delta.folders)
        .bind(delta.files)
        .bind(delta.bytes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to apply usage delta", e))?;
        Ok(())
    }

    async fn replace_usage(&self, usage: &UserUsage) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO foldershare_usage \
               (user_id, n_root_folders, n_folders, n_files, n_bytes) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
               n_root_folders = EXCLUDED.n_root_folders, \
               n_folders = EXCLUDED.n_folders, \
               n_files = EXCLUDED.n_files, \
               n_bytes = EXCLUDED.n_bytes",
        )
        .bind(usage.user_id.0)
        .bind(usage.n_root_folders)
        .bind(usage.n_folders)
        .bind(usage.n_files)
        .bind(usage.n_bytes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to replace usage", e))?;
        Ok(())
    }

    async fn list_usage(&self) -> AppResult<Vec<UserUsage>> {
        let rows = sqlx::query_as::<_, UsageRow>(
            "SELECT user_id, n_root_folders, n_folders, n_files, n_bytes \
             FROM foldershare_usage ORDER BY user_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list usage", e))?;
        Ok(rows.into_iter().map(UserUsage::from).collect())
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::store::{Item, ItemStore, StoreError};

/// Postgres-backed item store.
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            select id, title, created_at
            from items
            order by created_at desc
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn read_item(&self, item_id: i64) -> Result<Option<Item>, StoreError> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            select id, title, created_at
            from items
            where id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn create_item(&self, title: &str) -> Result<Item, StoreError> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            insert into items (title)
            values ($1)
            returning id, title, created_at
            "#,
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update_item(&self, item_id: i64, title: &str) -> Result<Option<Item>, StoreError> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            update items
            set title = $1
            where id = $2
            returning id, title, created_at
            "#,
        )
        .bind(title)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, StoreError> {
        let deleted = sqlx::query_scalar::<_, i64>(
            r#"
            delete from items
            where id = $1
            returning id
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted.is_some())
    }

    async fn is_reachable(&self) -> bool {
        sqlx::query_scalar::<_, i32>("select 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

//! Item persistence for the todo backend.
//!
//! The API depends on the narrow [`ItemStore`] capability rather than on a
//! concrete database, so the readiness probe and the HTTP handlers can be
//! exercised against fakes. The production implementation,
//! [`postgres::PgItemStore`], is backed by a sqlx connection pool.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors emitted by the item store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Error while interacting with PostgreSQL for items: {0}")]
    Database(#[from] sqlx::Error),
}

/// A single todo item.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Storage interface for todo items.
///
/// [`ItemStore::is_reachable`] doubles as the connectivity check consumed by
/// the readiness probe; it must stay lightweight.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Returns all items, newest first.
    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;

    /// Returns the item with the given id, if present.
    async fn read_item(&self, item_id: i64) -> Result<Option<Item>, StoreError>;

    /// Inserts a new item and returns it.
    async fn create_item(&self, title: &str) -> Result<Item, StoreError>;

    /// Updates an item's title, returning the updated item if it existed.
    async fn update_item(&self, item_id: i64, title: &str) -> Result<Option<Item>, StoreError>;

    /// Deletes an item, returning whether it existed.
    async fn delete_item(&self, item_id: i64) -> Result<bool, StoreError>;

    /// Lightweight connectivity check used by the readiness probe.
    async fn is_reachable(&self) -> bool;
}

//! Liked-items store interface
//!
//! The liked-items store lives outside this crate (the reference deployment
//! keeps it next to the user accounts). Discovery services only read it:
//! the mutators exist so the rendering layer has a complete contract to
//! implement against.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use cinescout_core::{LikedItem, MediaKey};

use crate::Result;

/// Per-user liked-items access.
#[async_trait]
pub trait LikedItemsStore: Send + Sync {
    /// All liked items for a user, most recently liked first.
    async fn list_for_user(&self, user: Uuid) -> Result<Vec<LikedItem>>;

    /// Whether the user has already liked the given item.
    async fn exists(&self, user: Uuid, key: MediaKey) -> Result<bool>;

    /// Record a like. Liking an already-liked item is a no-op.
    async fn add(&self, user: Uuid, item: LikedItem) -> Result<()>;

    /// Remove a like. Removing an absent item is a no-op.
    async fn remove(&self, user: Uuid, key: MediaKey) -> Result<()>;
}

/// In-memory store keeping newest likes first.
///
/// Reference implementation for tests and demos; production deployments back
/// the trait with their own persistence.
#[derive(Debug, Default)]
pub struct InMemoryLikedItems {
    items: RwLock<HashMap<Uuid, Vec<LikedItem>>>,
}

impl InMemoryLikedItems {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LikedItemsStore for InMemoryLikedItems {
    async fn list_for_user(&self, user: Uuid) -> Result<Vec<LikedItem>> {
        Ok(self
            .items
            .read()
            .await
            .get(&user)
            .cloned()
            .unwrap_or_default())
    }

    async fn exists(&self, user: Uuid, key: MediaKey) -> Result<bool> {
        Ok(self
            .items
            .read()
            .await
            .get(&user)
            .is_some_and(|list| list.iter().any(|item| item.key() == key)))
    }

    async fn add(&self, user: Uuid, item: LikedItem) -> Result<()> {
        let mut items = self.items.write().await;
        let list = items.entry(user).or_default();
        if !list.iter().any(|existing| existing.key() == item.key()) {
            list.insert(0, item);
        }
        Ok(())
    }

    async fn remove(&self, user: Uuid, key: MediaKey) -> Result<()> {
        let mut items = self.items.write().await;
        if let Some(list) = items.get_mut(&user) {
            list.retain(|item| item.key() != key);
        }
        Ok(())
    }
}

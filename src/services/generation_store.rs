//! Generated results kept around so a client can pick a track set by number
//! after the fact. Only the most recent `retention` generations are kept.

use crate::models::{MixesMap, StyleOrder};
use crate::services::catalog::Catalog;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// One completed generation together with the catalog it was computed from
#[derive(Debug)]
pub struct Generation {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub style_order: StyleOrder,
    pub max_songs: usize,
    pub catalog: Arc<Catalog>,
    pub mixes: MixesMap,
}

impl Generation {
    pub fn new(catalog: Arc<Catalog>, style_order: StyleOrder, max_songs: usize, mixes: MixesMap) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            style_order,
            max_songs,
            catalog,
            mixes,
        }
    }
}

#[derive(Default)]
struct Retained {
    by_id: HashMap<Uuid, Arc<Generation>>,
    order: VecDeque<Uuid>,
}

#[derive(Clone)]
pub struct GenerationStore {
    retention: usize,
    retained: Arc<RwLock<Retained>>,
}

impl GenerationStore {
    pub fn new(retention: usize) -> Self {
        Self {
            retention: retention.max(1),
            retained: Arc::new(RwLock::new(Retained::default())),
        }
    }

    pub async fn insert(&self, generation: Generation) -> Arc<Generation> {
        let generation = Arc::new(generation);
        let mut retained = self.retained.write().await;

        retained.order.push_back(generation.id);
        retained.by_id.insert(generation.id, generation.clone());

        while retained.order.len() > self.retention {
            if let Some(evicted) = retained.order.pop_front() {
                retained.by_id.remove(&evicted);
                debug!("Evicted generation {}", evicted);
            }
        }

        generation
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Generation>> {
        self.retained.read().await.by_id.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl GenerationStore {
        async fn len(&self) -> usize {
            self.retained.read().await.by_id.len()
        }
    }

    fn generation() -> Generation {
        Generation::new(
            Arc::new(Catalog::default()),
            StyleOrder::new(["fast"]),
            3,
            MixesMap::new(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = GenerationStore::new(4);
        let stored = store.insert(generation()).await;

        let found = store.get(stored.id).await.unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.max_songs, 3);
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_oldest_generations_are_evicted() {
        let store = GenerationStore::new(2);
        let first = store.insert(generation()).await;
        let second = store.insert(generation()).await;
        let third = store.insert(generation()).await;

        assert_eq!(store.len().await, 2);
        assert!(store.get(first.id).await.is_none());
        assert!(store.get(second.id).await.is_some());
        assert!(store.get(third.id).await.is_some());
    }
}

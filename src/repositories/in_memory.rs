use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::entities::material::{MaterialState, Model as MaterialModel};
use crate::errors::ServiceError;

use super::{MaterialPatch, MaterialStore, NewMaterial};

/// Process-local material store.
///
/// Ids come from a monotonically increasing sequence starting at 1 and are
/// never reused after a delete.
#[derive(Debug)]
pub struct InMemoryMaterialStore {
    records: DashMap<i32, MaterialModel>,
    next_id: AtomicI32,
}

impl Default for InMemoryMaterialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMaterialStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MaterialStore for InMemoryMaterialStore {
    async fn find_all(&self) -> Result<Vec<MaterialModel>, ServiceError> {
        let mut all: Vec<MaterialModel> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|m| m.id);
        Ok(all)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<MaterialModel>, ServiceError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, material: NewMaterial) -> Result<MaterialModel, ServiceError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let model = MaterialModel {
            id,
            design: material.design,
            state: material.state.unwrap_or_default(),
            quantity: material.quantity,
        };
        self.records.insert(id, model.clone());
        Ok(model)
    }

    async fn update_partial(&self, id: i32, patch: MaterialPatch) -> Result<(), ServiceError> {
        if let Some(mut entry) = self.records.get_mut(&id) {
            patch.apply_to(entry.value_mut());
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), ServiceError> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found(id))
    }

    async fn count(&self, state: Option<MaterialState>) -> Result<u64, ServiceError> {
        let count = match state {
            Some(state) => self
                .records
                .iter()
                .filter(|entry| entry.value().state == state)
                .count(),
            None => self.records.len(),
        };
        Ok(count as u64)
    }
}

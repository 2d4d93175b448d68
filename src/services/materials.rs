use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entities::material::{MaterialState, Model as MaterialModel},
    errors::ServiceError,
    metrics,
    repositories::{MaterialPatch, MaterialStore, NewMaterial},
};

/// Quantity totals grouped by condition state.
///
/// `total` always equals `good + damaging + bad`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"total": 15, "good": 10, "damaging": 0, "bad": 5}))]
pub struct MaterialQuantityStats {
    pub total: i64,
    pub good: i64,
    pub damaging: i64,
    pub bad: i64,
}

impl MaterialQuantityStats {
    /// Adds one record's quantity to the total and to its state bucket
    pub fn record(&mut self, material: &MaterialModel) {
        let quantity = i64::from(material.quantity);
        self.total += quantity;
        match material.state {
            MaterialState::Good => self.good += quantity,
            MaterialState::Damaging => self.damaging += quantity,
            MaterialState::Bad => self.bad += quantity,
        }
    }
}

impl<'a> FromIterator<&'a MaterialModel> for MaterialQuantityStats {
    fn from_iter<I: IntoIterator<Item = &'a MaterialModel>>(iter: I) -> Self {
        let mut stats = Self::default();
        for material in iter {
            stats.record(material);
        }
        stats
    }
}

/// Material accounting: CRUD over the store plus count and quantity aggregates
#[derive(Clone)]
pub struct MaterialService {
    store: Arc<dyn MaterialStore>,
}

impl MaterialService {
    pub fn new(store: Arc<dyn MaterialStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<MaterialModel>, ServiceError> {
        observe("find_all", self.store.find_all()).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<MaterialModel, ServiceError> {
        observe("find_by_id", async {
            self.store
                .find_by_id(id)
                .await?
                .ok_or_else(|| ServiceError::not_found(id))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn create_material(&self, input: NewMaterial) -> Result<MaterialModel, ServiceError> {
        observe("create", async {
            input.validate()?;
            let created = self.store.insert(input).await?;
            info!(id = created.id, state = %created.state, "material created");
            Ok(created)
        })
        .await
    }

    /// Applies a partial update. Existence is not checked.
    #[instrument(skip(self))]
    pub async fn update_material_by_id(
        &self,
        id: i32,
        patch: MaterialPatch,
    ) -> Result<(), ServiceError> {
        observe("update", async {
            patch.validate()?;
            self.store.update_partial(id, patch).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i32) -> Result<(), ServiceError> {
        observe("delete", async {
            self.store.delete_by_id(id).await?;
            info!(id, "material deleted");
            Ok(())
        })
        .await
    }

    /// Sums `quantity` over every record, split by state, in one pass
    #[instrument(skip(self))]
    pub async fn get_total_material_quantities(
        &self,
    ) -> Result<MaterialQuantityStats, ServiceError> {
        observe("quantity_stats", async {
            let materials = self.store.find_all().await?;
            Ok(materials.iter().collect())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_total_materials(&self) -> Result<u64, ServiceError> {
        self.count(None).await
    }

    #[instrument(skip(self))]
    pub async fn get_total_good_materials(&self) -> Result<u64, ServiceError> {
        self.count(Some(MaterialState::Good)).await
    }

    #[instrument(skip(self))]
    pub async fn get_total_damaging_materials(&self) -> Result<u64, ServiceError> {
        self.count(Some(MaterialState::Damaging)).await
    }

    #[instrument(skip(self))]
    pub async fn get_total_bad_materials(&self) -> Result<u64, ServiceError> {
        self.count(Some(MaterialState::Bad)).await
    }

    async fn count(&self, state: Option<MaterialState>) -> Result<u64, ServiceError> {
        observe("count", self.store.count(state)).await
    }
}

async fn observe<T, F>(operation: &'static str, fut: F) -> Result<T, ServiceError>
where
    F: std::future::Future<Output = Result<T, ServiceError>>,
{
    let start = Instant::now();
    let result = fut.await;
    metrics::record_operation(operation, result.as_ref().err(), start.elapsed());
    result
}

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::entities::material::{MaterialState, Model as MaterialModel};
use crate::errors::ServiceError;

pub mod in_memory;
pub mod material_repository;

pub use in_memory::InMemoryMaterialStore;
pub use material_repository::MaterialRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn validate_design(design: &str) -> Result<(), ValidationError> {
    if design.trim().is_empty() {
        let mut err = ValidationError::new("design");
        err.message = Some("design must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Fields accepted when inserting a material
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewMaterial {
    #[validate(length(max = 255), custom = "validate_design")]
    pub design: String,
    /// Falls back to `MaterialState::Good` when omitted
    pub state: Option<MaterialState>,
    #[validate(range(min = 0, message = "quantity must be non-negative"))]
    pub quantity: i32,
}

/// Partial update; `None` leaves the stored column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct MaterialPatch {
    #[validate(length(max = 255), custom = "validate_design")]
    pub design: Option<String>,
    pub state: Option<MaterialState>,
    #[validate(range(min = 0, message = "quantity must be non-negative"))]
    pub quantity: Option<i32>,
}

impl MaterialPatch {
    pub fn is_empty(&self) -> bool {
        self.design.is_none() && self.state.is_none() && self.quantity.is_none()
    }

    /// Applies the supplied fields onto an in-memory record
    pub fn apply_to(&self, material: &mut MaterialModel) {
        if let Some(design) = &self.design {
            material.design = design.clone();
        }
        if let Some(state) = self.state {
            material.state = state;
        }
        if let Some(quantity) = self.quantity {
            material.quantity = quantity;
        }
    }
}

/// Storage port for material records.
///
/// Implementations surface storage faults as `ServiceError::DatabaseError`
/// and only `delete_by_id` reports a lookup miss as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Every stored record, ordered by id
    async fn find_all(&self) -> Result<Vec<MaterialModel>, ServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<MaterialModel>, ServiceError>;

    async fn insert(&self, material: NewMaterial) -> Result<MaterialModel, ServiceError>;

    /// Applies `patch` to the record with `id`. A missing id is not an error.
    async fn update_partial(&self, id: i32, patch: MaterialPatch) -> Result<(), ServiceError>;

    /// Looks the record up first and fails with `NotFound` when it is absent
    async fn delete_by_id(&self, id: i32) -> Result<(), ServiceError>;

    /// Number of records, optionally restricted to one state
    async fn count(&self, state: Option<MaterialState>) -> Result<u64, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_design_is_rejected() {
        let input = NewMaterial {
            design: "   ".into(),
            state: None,
            quantity: 3,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("design"));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let patch = MaterialPatch {
            quantity: Some(-1),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut material = MaterialModel {
            id: 4,
            design: "copper-wire".into(),
            state: MaterialState::Damaging,
            quantity: 12,
        };
        MaterialPatch {
            quantity: Some(30),
            ..Default::default()
        }
        .apply_to(&mut material);

        assert_eq!(material.id, 4);
        assert_eq!(material.design, "copper-wire");
        assert_eq!(material.state, MaterialState::Damaging);
        assert_eq!(material.quantity, 30);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(MaterialPatch::default().is_empty());
        assert!(!MaterialPatch {
            state: Some(MaterialState::Bad),
            ..Default::default()
        }
        .is_empty());
    }
}

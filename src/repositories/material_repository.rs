use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::debug;

use crate::entities::material::{
    ActiveModel as MaterialActiveModel, Column, Entity as Material, MaterialState,
    Model as MaterialModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::{BaseRepository, MaterialPatch, MaterialStore, NewMaterial};

/// sea-orm backed material store
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    base: BaseRepository,
}

impl MaterialRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl MaterialStore for MaterialRepository {
    async fn find_all(&self) -> Result<Vec<MaterialModel>, AppError> {
        Material::find()
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<MaterialModel>, AppError> {
        Material::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    async fn insert(&self, material: NewMaterial) -> Result<MaterialModel, AppError> {
        let active = MaterialActiveModel {
            design: Set(material.design),
            state: Set(material.state.unwrap_or_default()),
            quantity: Set(material.quantity),
            ..Default::default()
        };

        active
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    async fn update_partial(&self, id: i32, patch: MaterialPatch) -> Result<(), AppError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut update = Material::update_many().filter(Column::Id.eq(id));
        if let Some(design) = patch.design {
            update = update.col_expr(Column::Design, Expr::value(design));
        }
        if let Some(state) = patch.state {
            update = update.col_expr(Column::State, Expr::value(state.to_value()));
        }
        if let Some(quantity) = patch.quantity {
            update = update.col_expr(Column::Quantity, Expr::value(quantity));
        }

        let result = update.exec(self.base.get_db()).await?;
        debug!(id, rows = result.rows_affected, "material update applied");
        Ok(())
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), AppError> {
        let material = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))?;

        material
            .delete(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(())
    }

    async fn count(&self, state: Option<MaterialState>) -> Result<u64, AppError> {
        let mut query = Material::find();
        if let Some(state) = state {
            query = query.filter(Column::State.eq(state));
        }

        query
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }
}

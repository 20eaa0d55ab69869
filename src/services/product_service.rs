use sea_orm::*;

use crate::errors::ApiError;
use crate::models::dto::{CreateProductRequest, UpdateProductRequest};
use crate::models::product;

pub struct ProductService;

impl ProductService {
    /// Page `page` (à partir de 1) de `limit` produits, triés par id
    pub async fn list_page(
        db: &DatabaseConnection,
        page: u64,
        limit: u64,
    ) -> Result<Vec<product::Model>, DbErr> {
        product::Entity::find()
            .order_by_asc(product::Column::Id)
            .paginate(db, limit)
            .fetch_page(page.saturating_sub(1))
            .await
    }

    pub async fn find(db: &DatabaseConnection, id: i32) -> Result<product::Model, ApiError> {
        product::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("Product not found"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        request: CreateProductRequest,
    ) -> Result<product::Model, ApiError> {
        let new_product = product::ActiveModel::new(
            request.name,
            request.description,
            request.price,
            request.stock,
        );

        Ok(new_product.insert(db).await?)
    }

    /// Applique uniquement les champs fournis sur le produit existant
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        request: UpdateProductRequest,
    ) -> Result<product::Model, ApiError> {
        let existing = Self::find(db, id).await?;
        let mut active_model: product::ActiveModel = existing.into();

        if let Some(name) = request.name {
            active_model.name = Set(name);
        }
        if let Some(description) = request.description {
            active_model.description = Set(description);
        }
        if let Some(price) = request.price {
            active_model.price = Set(price);
        }
        if let Some(stock) = request.stock {
            active_model.stock = Set(stock);
        }
        active_model.touch();

        Ok(active_model.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
        let result = product::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ApiError::not_found("Product not found"));
        }
        Ok(())
    }
}

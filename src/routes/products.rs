use actix_web::{get, post, put, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::AdminUser;
use crate::models::dto::{CachedEnvelope, CreateProductRequest, MessageResponse, PageQuery, ProductView, UpdateProductRequest};
use crate::services::cache::{TagCache, PRODUCTS_TAG};
use crate::services::product_service::ProductService;

const DEFAULT_LIMIT: u64 = 3;

/// GET /api/products?page&limit - Liste paginée, via le cache
#[get("")]
pub async fn get_all_products(
    query: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    let (page, limit) = query.resolve(DEFAULT_LIMIT)?;
    let cache_key = format!("getAllProducts-{}-{}", page, limit);

    let (data, status) = cache
        .get_or_try_insert(&cache_key, &[PRODUCTS_TAG], || async {
            let products = ProductService::list_page(db.get_ref(), page, limit).await?;
            let views: Vec<ProductView> = products.into_iter().map(ProductView::from).collect();
            serde_json::to_value(views).map_err(ApiError::internal)
        })
        .await?;

    Ok(HttpResponse::Ok().json(CachedEnvelope {
        message: status.message(),
        data,
    }))
}

/// GET /api/products/{id}
#[get("/{id}")]
pub async fn get_product(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let product = ProductService::find(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProductView::from(product)))
}

/// POST /api/products - Créer un produit (ADMIN)
#[post("")]
pub async fn create_product(
    AdminUser(admin): AdminUser,
    body: web::Json<CreateProductRequest>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let product = ProductService::create(db.get_ref(), body.into_inner()).await?;
    cache.invalidate_tags(&[PRODUCTS_TAG]).await;

    tracing::info!(product_id = product.id, by = admin.user_id, "product created");
    Ok(HttpResponse::Created().json(ProductView::from(product)))
}

/// PUT /api/products/{id} - Mettre à jour un produit (ADMIN)
#[put("/{id}")]
pub async fn update_product(
    AdminUser(admin): AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateProductRequest>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let product = ProductService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    cache.invalidate_tags(&[PRODUCTS_TAG]).await;

    tracing::info!(product_id = product.id, by = admin.user_id, "product updated");
    Ok(HttpResponse::Ok().json(ProductView::from(product)))
}

/// DELETE /api/products/{id} - Supprimer un produit (ADMIN)
#[delete("/{id}")]
pub async fn delete_product(
    AdminUser(admin): AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    ProductService::delete(db.get_ref(), id).await?;
    cache.invalidate_tags(&[PRODUCTS_TAG]).await;

    tracing::info!(product_id = id, by = admin.user_id, "product deleted");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Product deleted successfully",
    }))
}

pub fn product_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(get_all_products)
            .service(create_product)
            .service(get_product)
            .service(update_product)
            .service(delete_product)
    );
}

use actix_web::{get, post, put, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::{AdminClientUser, AdminUser, AuthUser};
use crate::models::dto::{CachedEnvelope, CreateUserRequest, MessageResponse, PageQuery, UpdateUserRequest, UserFields, UserView};
use crate::services::cache::{TagCache, USERS_TAG};
use crate::services::user_service::UserService;
use crate::utils::password::PasswordHasher;

const DEFAULT_LIMIT: u64 = 5;

/// GET /api/users/{id} - Un utilisateur, via le cache
#[get("/{id}")]
pub async fn get_user(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let cache_key = format!("getUser-{}", id);

    let (data, status) = cache
        .get_or_try_insert(&cache_key, &[USERS_TAG], || async {
            let (user, client) = UserService::find_with_client(db.get_ref(), id).await?;
            serde_json::to_value(UserView::new(user, client)).map_err(ApiError::internal)
        })
        .await?;

    Ok(HttpResponse::Ok().json(CachedEnvelope {
        message: status.message(),
        data,
    }))
}

/// GET /api/users?page&limit - Utilisateurs du client de l'appelant (AUTHENTIFIÉ)
#[get("")]
pub async fn get_all_users(
    auth_user: Option<AuthUser>,
    query: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    // 1. L'appelant doit être authentifié et rattaché à un client
    let auth_user = auth_user.ok_or_else(|| ApiError::forbidden("Authentication required"))?;
    let client_id = auth_user
        .client_id
        .ok_or_else(|| ApiError::forbidden("User is not associated with a client"))?;

    // 2. Page demandée, via le cache
    let (page, limit) = query.resolve(DEFAULT_LIMIT)?;
    let cache_key = format!("getAllUsers-{}-{}-{}", client_id, page, limit);

    let (data, status) = cache
        .get_or_try_insert(&cache_key, &[USERS_TAG], || async {
            let (users, owner) = UserService::list_for_client(db.get_ref(), client_id, page, limit).await?;
            let views: Vec<UserView> = users
                .into_iter()
                .map(|user| UserView::new(user, owner.clone()))
                .collect();
            serde_json::to_value(views).map_err(ApiError::internal)
        })
        .await?;

    // 3. Page vide -> 404
    if data.as_array().is_none_or(|users| users.is_empty()) {
        return Err(ApiError::not_found("No users found for this client"));
    }

    Ok(HttpResponse::Ok().json(CachedEnvelope {
        message: status.message(),
        data,
    }))
}

/// POST /api/users - Créer un utilisateur (ADMIN + CLIENT)
#[post("")]
pub async fn create_user(
    AdminClientUser(admin): AdminClientUser,
    body: web::Json<CreateUserRequest>,
    db: web::Data<DatabaseConnection>,
    hasher: web::Data<PasswordHasher>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let user = UserService::create(db.get_ref(), hasher.get_ref(), body.into_inner()).await?;
    cache.invalidate_tags(&[USERS_TAG]).await;

    tracing::info!(user_id = user.id, client_id = user.client_id, by = admin.user_id, "user created");
    Ok(HttpResponse::Created().json(UserFields::from(user)))
}

/// PUT /api/users/{id} - Mettre à jour un utilisateur (ADMIN)
#[put("/{id}")]
pub async fn update_user(
    AdminUser(admin): AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateUserRequest>,
    db: web::Data<DatabaseConnection>,
    hasher: web::Data<PasswordHasher>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let user = UserService::update(db.get_ref(), hasher.get_ref(), path.into_inner(), body.into_inner()).await?;
    cache.invalidate_tags(&[USERS_TAG]).await;

    tracing::info!(user_id = user.id, by = admin.user_id, "user updated");
    Ok(HttpResponse::Ok().json(UserFields::from(user)))
}

/// DELETE /api/users/{id} - Supprimer un utilisateur (ADMIN)
#[delete("/{id}")]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<TagCache>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    UserService::delete(db.get_ref(), id).await?;
    cache.invalidate_tags(&[USERS_TAG]).await;

    tracing::info!(user_id = id, by = admin.user_id, "user deleted");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User deleted successfully",
    }))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(get_all_users)
            .service(create_user)
            .service(get_user)
            .service(update_user)
            .service(delete_user)
    );
}

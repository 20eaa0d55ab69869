use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtKeys;
use crate::utils::password::PasswordHasher;

// Les deux champs sont optionnels pour renvoyer un 400 explicite
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login_check - Échange email + mot de passe contre un JWT (PUBLIC)
#[post("/login_check")]
pub async fn login_check(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    hasher: web::Data<PasswordHasher>,
    keys: web::Data<JwtKeys>,
) -> Result<HttpResponse, ApiError> {
    // 1. Vérifier la présence des identifiants
    let body = body.into_inner();
    let (username, password) = match (body.username, body.password) {
        (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => (u, p),
        _ => return Err(ApiError::bad_request("Username and password are required")),
    };

    // 2. Vérifier email + mot de passe
    let Some(user) = UserService::authenticate(db.get_ref(), hasher.get_ref(), username.trim(), &password).await? else {
        tracing::warn!(username = %username, "login failed");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    // 3. Générer le JWT
    let token = keys.generate_token(&user).map_err(ApiError::internal)?;

    tracing::info!(user_id = user.id, "login succeeded");
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login_check);
}

// Contrôle d'accès par route, évalué avant chaque handler de /api
//
// Table des politiques (méthode + chemin -> rôles requis) au lieu
// d'annotations sur chaque route.

use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
    web, Error, HttpMessage, ResponseError,
};

use crate::errors::ApiError;
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::models::users::{ROLE_ADMIN, ROLE_CLIENT};
use crate::utils::jwt::JwtKeys;

pub const ADMIN: &[&str] = &[ROLE_ADMIN];
pub const ADMIN_AND_CLIENT: &[&str] = &[ROLE_ADMIN, ROLE_CLIENT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    /// Tous les rôles listés sont requis
    Roles(&'static [&'static str]),
}

pub fn policy_for(method: &Method, path: &str) -> Access {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["api", "products"]) => Access::Roles(ADMIN),
        ("PUT" | "DELETE", ["api", "products", _]) => Access::Roles(ADMIN),
        ("GET", ["api", "users"]) => Access::Authenticated,
        ("POST", ["api", "users"]) => Access::Roles(ADMIN_AND_CLIENT),
        ("PUT" | "DELETE", ["api", "users", _]) => Access::Roles(ADMIN),
        _ => Access::Public,
    }
}

/// Sans principal: 403 sur une route authentifiée, 401 sur une route à rôles
/// Avec principal: 403 s'il manque un rôle
pub fn authorize(access: Access, user: Option<&AuthUser>) -> Result<(), ApiError> {
    match (access, user) {
        (Access::Public, _) => Ok(()),
        (Access::Authenticated, None) => Err(ApiError::forbidden("Authentication required")),
        (Access::Roles(_), None) => Err(ApiError::unauthorized("Authentication required")),
        (Access::Authenticated, Some(_)) => Ok(()),
        (Access::Roles(required), Some(user)) => {
            if required.iter().all(|role| user.has_role(role)) {
                Ok(())
            } else {
                Err(ApiError::forbidden("Access denied"))
            }
        }
    }
}

fn resolve_principal(req: &ServiceRequest) -> Result<Option<AuthUser>, ApiError> {
    let Some(token) = bearer_token(req.headers())? else {
        return Ok(None);
    };

    let keys = req
        .app_data::<web::Data<JwtKeys>>()
        .ok_or_else(|| ApiError::internal("JWT keys are not configured"))?;

    let claims = keys
        .verify_token(token)
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

    Ok(Some(AuthUser::from(claims)))
}

pub async fn access_control<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    // chemin décodé, celui sur lequel le routeur fait le matching
    let access = policy_for(req.method(), req.match_info().as_str());

    let checked = resolve_principal(&req)
        .and_then(|principal| authorize(access, principal.as_ref()).map(|_| principal));

    let principal = match checked {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(method = %req.method(), path = req.path(), error = %err, "access denied");
            let response = err.error_response();
            return Ok(req.into_response(response).map_into_right_body());
        }
    };

    if let Some(user) = principal {
        req.extensions_mut().insert(user);
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

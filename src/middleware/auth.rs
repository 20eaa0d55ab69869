use actix_web::{dev::Payload, http::header::{HeaderMap, AUTHORIZATION}, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::middleware::access::{authorize, Access, ADMIN, ADMIN_AND_CLIENT};
use crate::utils::jwt::Claims;

/// Utilisateur authentifié, attaché à la requête par `access_control`
/// Utilisé comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub roles: Vec<String>,
    pub client_id: Option<i32>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            roles: claims.roles,
            client_id: claims.client_id,
        }
    }
}

/// Le token a déjà été vérifié par le middleware: on relit simplement
/// le principal depuis les extensions de la requête
impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ApiError::unauthorized("Authentication required")),
        )
    }
}

/// Principal portant ROLE_ADMIN
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Principal portant ROLE_ADMIN et ROLE_CLIENT
#[derive(Debug, Clone)]
pub struct AdminClientUser(pub AuthUser);

// Même règle que le middleware, revérifiée sur la route effectivement atteinte
fn principal_with(req: &HttpRequest, access: Access) -> Result<AuthUser, ApiError> {
    let user = req.extensions().get::<AuthUser>().cloned();
    authorize(access, user.as_ref())?;
    user.ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_with(req, Access::Roles(ADMIN)).map(AdminUser))
    }
}

impl FromRequest for AdminClientUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_with(req, Access::Roles(ADMIN_AND_CLIENT)).map(AdminClientUser))
    }
}

/// Extrait le token du header Authorization (format: "Bearer <token>")
/// Ok(None) si le header est absent
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization format (expected: Bearer <token>)"))
}

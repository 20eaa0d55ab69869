// Vues JSON exposées par l'API et payloads entrants
//
// Chaque vue correspond à un groupe de sérialisation:
//   - ProductView : groupe "product"
//   - UserView    : groupes "user" + "client"
//   - ClientView  : groupe "client"
// Aucune vue ne contient le mot de passe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::ApiError;
use crate::models::{client, product, users};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Link {
    pub href: String,
}

/// Liens HATEOAS d'une ressource
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub update: Link,
    pub delete: Link,
}

impl ResourceLinks {
    /// self, update et delete pointent tous sur /api/<collection>/<id>
    pub fn for_resource(collection: &str, id: i32) -> Self {
        let href = format!("/api/{}/{}", collection, id);
        Self {
            self_link: Link { href: href.clone() },
            update: Link { href: href.clone() },
            delete: Link { href },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    #[serde(rename = "_links")]
    pub links: ResourceLinks,
}

impl From<product::Model> for ProductView {
    fn from(product: product::Model) -> Self {
        Self {
            links: ResourceLinks::for_resource("products", product.id),
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientView {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<client::Model> for ClientView {
    fn from(client: client::Model) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub client: Option<ClientView>,
    #[serde(rename = "_links")]
    pub links: ResourceLinks,
}

impl UserView {
    pub fn new(user: users::Model, client: Option<client::Model>) -> Self {
        Self {
            links: ResourceLinks::for_resource("users", user.id),
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            client: client.map(ClientView::from),
        }
    }
}

/// Écho simple renvoyé après création / mise à jour d'un utilisateur
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserFields {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

impl From<users::Model> for UserFields {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
        }
    }
}

/// Enveloppe des lectures passant par le cache
#[derive(Debug, Serialize)]
pub struct CachedEnvelope {
    pub message: &'static str,
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub time: DateTime<Utc>,
}

// ----------------------------------------------------------------------------
// Payloads entrants
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Retourne (page, limit) validés, avec la limite par défaut de la route
    pub fn resolve(&self, default_limit: u64) -> Result<(u64, u64), ApiError> {
        self.validate()?;
        Ok((self.page.unwrap_or(1), self.limit.unwrap_or(default_limit)))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub firstname: String,
    #[validate(length(min = 1, max = 255))]
    pub lastname: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: Option<String>,
    // lu à part: ne fait pas partie de l'entité
    pub client_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub lastname: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    pub password: Option<String>,
}

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_CLIENT: &str = "ROLE_CLIENT";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    #[sea_orm(unique)]
    pub email: String, // identifiant de connexion
    #[serde(skip_serializing)] // Jamais exposé en JSON
    pub password: String, // Format: pbkdf2:sha256:iterations$salt$hash
    pub roles: Json, // Tableau JSON: ["ROLE_USER", ...]
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub client_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Suppression d'un client refusée tant que des utilisateurs le référencent
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_delete = "Restrict"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rôles effectifs: ROLE_USER est toujours présent
    pub fn roles(&self) -> Vec<String> {
        effective_roles(&self.roles)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }
}

impl ActiveModel {
    /// Nouvel utilisateur; `password_hash` doit déjà être hashé
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
        roles: &[&str],
        client_id: i32,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            firstname: Set(firstname.into()),
            lastname: Set(lastname.into()),
            email: Set(email.into()),
            password: Set(password_hash),
            roles: Set(roles_to_json(roles)),
            client_id: Set(client_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Set(chrono::Utc::now());
    }
}

pub fn roles_to_json(roles: &[&str]) -> Json {
    Json::Array(roles.iter().map(|r| Json::String((*r).to_owned())).collect())
}

fn effective_roles(stored: &Json) -> Vec<String> {
    let mut roles: Vec<String> = stored
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    if !roles.iter().any(|r| r == ROLE_USER) {
        roles.push(ROLE_USER.to_string());
    }
    roles
}

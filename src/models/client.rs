use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

// Un client possède plusieurs utilisateurs
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Nouveau client, created_at et updated_at initialisés à maintenant
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            name: Set(name.into()),
            email: Set(email.into()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Set(chrono::Utc::now());
    }
}

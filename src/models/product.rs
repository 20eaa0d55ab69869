use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64, stock: i32) -> Self {
        let now = chrono::Utc::now();
        Self {
            name: Set(name.into()),
            description: Set(description.into()),
            price: Set(price),
            stock: Set(stock),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    /// À appeler sur chaque chemin de mise à jour
    pub fn touch(&mut self) {
        self.updated_at = Set(chrono::Utc::now());
    }
}

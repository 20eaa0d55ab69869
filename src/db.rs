// connexion BD + création du schéma

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::models::{client, product, users};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Crée les tables à partir des entités (si absentes)
/// client avant user à cause de la clé étrangère
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, client::Entity).await?;
    create_table(db, users::Entity).await?;
    create_table(db, product::Entity).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    tracing::debug!(table = entity.table_name(), "table ready");
    Ok(())
}

// Données de démo: 2 clients, 10 utilisateurs + 1 admin, 10 produits
//
// Le rattachement utilisateur -> client est tiré au sort avec un RNG
// initialisé par `seed`: même seed, même répartition.

use rand::{rngs::StdRng, Rng, SeedableRng};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, TransactionTrait};

use crate::models::{client, product, users};
use crate::models::users::{ROLE_ADMIN, ROLE_CLIENT, ROLE_USER};
use crate::utils::password::{PasswordError, PasswordHasher};

pub const FIXTURE_PASSWORD: &str = "password";
pub const ADMIN_EMAIL: &str = "admin@example.com";

const USER_COUNT: usize = 10;
const PRODUCT_COUNT: i32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Database already contains users, refusing to seed")]
    AlreadySeeded,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSummary {
    pub clients: usize,
    pub users: usize,
    pub products: usize,
}

pub async fn load_fixtures(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    seed: u64,
) -> Result<FixtureSummary, FixtureError> {
    if users::Entity::find().count(db).await? > 0 {
        return Err(FixtureError::AlreadySeeded);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    // tous les comptes de démo partagent le même mot de passe: un seul hash
    let password_hash = hasher.hash_password(FIXTURE_PASSWORD)?;

    let txn = db.begin().await?;

    // 1. Clients
    let client1 = client::ActiveModel::new("Client 1", "client1@example.com")
        .insert(&txn)
        .await?;
    let client2 = client::ActiveModel::new("Client 2", "client2@example.com")
        .insert(&txn)
        .await?;

    // 2. Utilisateurs, client choisi au hasard
    for i in 0..USER_COUNT {
        let owner = if rng.gen_bool(0.5) { &client1 } else { &client2 };

        users::ActiveModel::new(
            format!("Prénom {}", i),
            format!("Nom {}", i),
            format!("user{}@example.com", i),
            password_hash.clone(),
            &[ROLE_USER],
            owner.id,
        )
        .insert(&txn)
        .await?;
    }

    // 3. Admin, rattaché au client 1
    users::ActiveModel::new(
        "Admin",
        "Admin",
        ADMIN_EMAIL,
        password_hash,
        &[ROLE_ADMIN, ROLE_CLIENT],
        client1.id,
    )
    .insert(&txn)
    .await?;

    // 4. Produits: prix 10, 20, 30... stock 99, 98, 97...
    for i in 1..=PRODUCT_COUNT {
        product::ActiveModel::new(
            format!("Produit {}", i),
            format!("Description du produit {}", i),
            10.0 * f64::from(i),
            100 - i,
        )
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    let summary = FixtureSummary {
        clients: 2,
        users: USER_COUNT + 1,
        products: PRODUCT_COUNT as usize,
    };
    tracing::info!(?summary, seed, "fixtures loaded");
    Ok(summary)
}

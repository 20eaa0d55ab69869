// Utilitaires partagés par les tests d'intégration

use actix_web::http::header::{self, HeaderName};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use catalog_api::config::AppConfig;
use catalog_api::models::users;
use catalog_api::{db, fixtures, AppState};

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

/// Base SQLite en mémoire, schéma créé, fixtures chargées (seed 42)
pub async fn seeded_state() -> AppState {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        // PBKDF2 rapide pour les tests
        "PASSWORD_HASH_ITERATIONS" => Some("1000".to_string()),
        _ => None,
    })
    .expect("Failed to build test config");

    let connection = db::establish_connection(&config.database_url)
        .await
        .expect("Failed to create test database");
    db::create_schema(&connection)
        .await
        .expect("Failed to create schema");

    let state = AppState::new(connection, &config);
    fixtures::load_fixtures(&state.db, &state.hasher, 42)
        .await
        .expect("Failed to load fixtures");

    state
}

pub async fn find_user(state: &AppState, email: &str) -> users::Model {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(&state.db)
        .await
        .expect("Database error")
        .expect("User not found")
}

/// JWT signé pour un utilisateur existant
pub async fn token_for(state: &AppState, email: &str) -> String {
    let user = find_user(state, email).await;
    state.jwt.generate_token(&user).expect("Failed to sign token")
}

pub fn bearer(token: &str) -> (HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

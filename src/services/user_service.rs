use sea_orm::*;

use crate::errors::ApiError;
use crate::models::dto::{CreateUserRequest, UpdateUserRequest};
use crate::models::users::{self, ROLE_USER};
use crate::models::client;
use crate::utils::password::{self, PasswordHasher};

pub struct UserService;

impl UserService {
    /// Utilisateur + son client
    pub async fn find_with_client(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<(users::Model, Option<client::Model>), ApiError> {
        users::Entity::find_by_id(id)
            .find_also_related(client::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Page d'utilisateurs rattachés à `client_id`, triés par id
    pub async fn list_for_client(
        db: &DatabaseConnection,
        client_id: i32,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<users::Model>, Option<client::Model>), DbErr> {
        let owner = client::Entity::find_by_id(client_id).one(db).await?;

        let users = users::Entity::find()
            .filter(users::Column::ClientId.eq(client_id))
            .order_by_asc(users::Column::Id)
            .paginate(db, limit)
            .fetch_page(page.saturating_sub(1))
            .await?;

        Ok((users, owner))
    }

    /// Vérifie email + mot de passe; None si l'un des deux est faux
    /// Un email inconnu coûte le même PBKDF2 qu'un mot de passe faux
    pub async fn authenticate(
        db: &DatabaseConnection,
        hasher: &PasswordHasher,
        email: &str,
        plain_password: &str,
    ) -> Result<Option<users::Model>, ApiError> {
        // 1. Trouver l'utilisateur
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?;

        // 2. Vérifier le mot de passe (PBKDF2 coûteux: hors du thread async)
        let candidate = plain_password.to_string();
        let stored = user
            .as_ref()
            .map_or_else(|| hasher.dummy_hash(), |u| u.password.clone());
        let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&candidate, &stored))
            .await
            .map_err(ApiError::internal)?
            .map_err(ApiError::internal)?;

        Ok(user.filter(|_| is_valid))
    }

    pub async fn create(
        db: &DatabaseConnection,
        hasher: &PasswordHasher,
        request: CreateUserRequest,
    ) -> Result<users::Model, ApiError> {
        // 1. Client obligatoire et existant
        let client_id = request
            .client_id
            .ok_or_else(|| ApiError::bad_request("Client ID is required"))?;

        let client = client::Entity::find_by_id(client_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("Client not found"))?;

        // 2. Mot de passe obligatoire
        let plain_password = match request.password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(ApiError::bad_request("Password is required")),
        };

        // 3. Email unique
        if Self::email_taken(db, &request.email, None).await? {
            return Err(ApiError::conflict("Email already exists"));
        }

        // 4. Hash + insertion
        let password_hash = hash_off_thread(hasher, plain_password).await?;

        let new_user = users::ActiveModel::new(
            request.firstname,
            request.lastname,
            request.email,
            password_hash,
            &[ROLE_USER],
            client.id,
        );

        Ok(new_user.insert(db).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        hasher: &PasswordHasher,
        id: i32,
        request: UpdateUserRequest,
    ) -> Result<users::Model, ApiError> {
        let existing = users::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let mut active_model: users::ActiveModel = existing.into();

        if let Some(firstname) = request.firstname {
            active_model.firstname = Set(firstname);
        }
        if let Some(lastname) = request.lastname {
            active_model.lastname = Set(lastname);
        }
        if let Some(email) = request.email {
            if Self::email_taken(db, &email, Some(id)).await? {
                return Err(ApiError::conflict("Email already exists"));
            }
            active_model.email = Set(email);
        }
        if let Some(plain_password) = request.password {
            if plain_password.is_empty() {
                return Err(ApiError::bad_request("Password is required"));
            }
            active_model.password = Set(hash_off_thread(hasher, plain_password).await?);
        }
        active_model.touch();

        Ok(active_model.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
        let result = users::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ApiError::not_found("User not found"));
        }
        Ok(())
    }

    async fn email_taken(
        db: &DatabaseConnection,
        email: &str,
        except_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except_id {
            query = query.filter(users::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }
}

async fn hash_off_thread(hasher: &PasswordHasher, plain_password: String) -> Result<String, ApiError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash_password(&plain_password))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)
}

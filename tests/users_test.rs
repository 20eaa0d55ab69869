mod common;

use actix_web::{http::StatusCode, test};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde_json::{json, Value};

use catalog_api::build_app;
use catalog_api::fixtures::{ADMIN_EMAIL, FIXTURE_PASSWORD};
use catalog_api::models::users::{self, ROLE_ADMIN, ROLE_USER};
use catalog_api::utils::jwt::Claims;
use common::{bearer, find_user, seeded_state, token_for, TEST_SECRET};

fn new_user_payload(email: &str) -> Value {
    json!({
        "firstname": "Grace",
        "lastname": "Hopper",
        "email": email,
        "password": "cobol-rules",
        "client_id": 1
    })
}

#[actix_web::test]
async fn get_user_is_cached_and_hides_password() {
    let state = seeded_state().await;
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::get().uri("/api/users/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Data is not in cache yet.");
    assert_eq!(body["data"]["email"], "user0@example.com");
    assert!(body["data"]["client"]["id"].is_number());
    assert_eq!(body["data"]["_links"]["self"]["href"], "/api/users/1");
    assert!(body["data"].get("password").is_none());

    let req = test::TestRequest::get().uri("/api/users/1").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["message"], "Data is in cache.");
}

#[actix_web::test]
async fn get_unknown_user_is_404() {
    let state = seeded_state().await;
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::get().uri("/api/users/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_is_scoped_to_callers_client() {
    let state = seeded_state().await;
    let admin = find_user(&state, ADMIN_EMAIL).await;
    let token = token_for(&state, ADMIN_EMAIL).await;

    let expected = users::Entity::find()
        .filter(users::Column::ClientId.eq(admin.client_id))
        .count(&state.db)
        .await
        .unwrap();

    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/api/users?page=1&limit=100")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len() as u64, expected);
    for user in data {
        assert_eq!(user["client"]["id"], admin.client_id);
        assert!(user.get("password").is_none());
    }
}

#[actix_web::test]
async fn list_pages_by_five_in_id_order() {
    let state = seeded_state().await;
    let admin = find_user(&state, ADMIN_EMAIL).await;

    // au moins 8 utilisateurs sur le client de l'admin
    for i in 0..7 {
        users::ActiveModel::new(
            "Extra",
            format!("User {}", i),
            format!("extra{}@example.com", i),
            admin.password.clone(),
            &[ROLE_USER],
            admin.client_id,
        )
        .insert(&state.db)
        .await
        .unwrap();
    }

    let expected: Vec<i32> = users::Entity::find()
        .filter(users::Column::ClientId.eq(admin.client_id))
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert!(expected.len() >= 8);

    let token = token_for(&state, ADMIN_EMAIL).await;
    let app = test::init_service(build_app(state)).await;

    let mut pages = Vec::new();
    for uri in ["/api/users", "/api/users?page=2"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let ids: Vec<i32> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_i64().unwrap() as i32)
            .collect();
        pages.push(ids);
    }

    assert_eq!(pages[0], expected[..5].to_vec());
    assert_eq!(pages[1], expected[5..expected.len().min(10)].to_vec());
}

#[actix_web::test]
async fn list_requires_authentication_and_client() {
    let state = seeded_state().await;
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Authentication required");

    // token valide mais sans client rattaché
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: 1,
        username: "orphan@example.com".into(),
        roles: vec!["ROLE_USER".into()],
        client_id: None,
        iat: now,
        exp: now + 600,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn list_empty_page_is_404() {
    let state = seeded_state().await;
    let token = token_for(&state, ADMIN_EMAIL).await;
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/api/users?page=50&limit=5")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_user_validates_client_and_password() {
    let state = seeded_state().await;
    let token = token_for(&state, ADMIN_EMAIL).await;
    let app = test::init_service(build_app(state)).await;

    let mut without_client = new_user_payload("a@example.com");
    without_client.as_object_mut().unwrap().remove("client_id");
    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(&without_client)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Client ID is required");

    let mut unknown_client = new_user_payload("b@example.com");
    unknown_client["client_id"] = json!(999);
    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(&unknown_client)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let mut without_password = new_user_payload("c@example.com");
    without_password.as_object_mut().unwrap().remove("password");
    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(&without_password)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Password is required");
}

#[actix_web::test]
async fn create_user_hashes_password_and_echoes_fields() {
    let state = seeded_state().await;
    let token = token_for(&state, ADMIN_EMAIL).await;
    let app = test::init_service(build_app(state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(new_user_payload("grace@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "grace@example.com");
    assert_eq!(body["firstname"], "Grace");
    assert!(body.get("password").is_none());
    assert!(body.get("_links").is_none());

    let stored = find_user(&state, "grace@example.com").await;
    assert_ne!(stored.password, "cobol-rules");
    assert_eq!(stored.client_id, 1);

    // le nouvel utilisateur peut se connecter
    let req = test::TestRequest::post()
        .uri("/api/login_check")
        .set_json(json!({ "username": "grace@example.com", "password": "cobol-rules" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // même email une seconde fois
    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(new_user_payload("grace@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn create_user_requires_admin_and_client_roles() {
    let state = seeded_state().await;

    // admin sans ROLE_CLIENT
    let admin = find_user(&state, ADMIN_EMAIL).await;
    let mut admin_only: users::ActiveModel = admin.into();
    admin_only.roles = sea_orm::Set(users::roles_to_json(&[ROLE_ADMIN]));
    admin_only.update(&state.db).await.unwrap();
    let admin_only_token = token_for(&state, ADMIN_EMAIL).await;

    let user_token = token_for(&state, "user1@example.com").await;
    let app = test::init_service(build_app(state)).await;

    for token in [admin_only_token, user_token] {
        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(bearer(&token))
            .set_json(new_user_payload("denied@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(new_user_payload("denied@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn encoded_paths_still_require_roles() {
    let state = seeded_state().await;
    let user_token = token_for(&state, "user0@example.com").await;
    let app = test::init_service(build_app(state.clone())).await;

    // %75 = 'u'
    let req = test::TestRequest::post()
        .uri("/api/%75sers")
        .insert_header(bearer(&user_token))
        .set_json(new_user_payload("sneaky@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri("/api/%75sers/2")
        .insert_header(bearer(&user_token))
        .set_json(json!({ "firstname": "Hijacked" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri("/api/%75sers/2")
        .insert_header(bearer(&user_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let untouched = find_user(&state, "user1@example.com").await;
    assert_eq!(untouched.id, 2);
    assert_eq!(untouched.firstname, "Prénom 1");
    let created = users::Entity::find()
        .filter(users::Column::Email.eq("sneaky@example.com"))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(created, 0);
}

#[actix_web::test]
async fn update_user_changes_fields_and_password() {
    let state = seeded_state().await;
    let token = token_for(&state, ADMIN_EMAIL).await;
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::put()
        .uri("/api/users/2")
        .insert_header(bearer(&token))
        .set_json(json!({ "lastname": "Updated", "password": "new-secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 2);
    assert_eq!(body["lastname"], "Updated");
    assert_eq!(body["email"], "user1@example.com");

    let req = test::TestRequest::post()
        .uri("/api/login_check")
        .set_json(json!({ "username": "user1@example.com", "password": "new-secret" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/login_check")
        .set_json(json!({ "username": "user1@example.com", "password": FIXTURE_PASSWORD }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri("/api/users/2")
        .insert_header(bearer(&token))
        .set_json(json!({ "email": ADMIN_EMAIL }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn update_refreshes_cached_user() {
    let state = seeded_state().await;
    let token = token_for(&state, ADMIN_EMAIL).await;
    let app = test::init_service(build_app(state)).await;

    let get = || test::TestRequest::get().uri("/api/users/3").to_request();
    test::call_service(&app, get()).await;

    let req = test::TestRequest::put()
        .uri("/api/users/3")
        .insert_header(bearer(&token))
        .set_json(json!({ "firstname": "Changed" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let body: Value = test::read_body_json(test::call_service(&app, get()).await).await;
    assert_eq!(body["message"], "Data is not in cache yet.");
    assert_eq!(body["data"]["firstname"], "Changed");
}

#[actix_web::test]
async fn delete_user_then_404() {
    let state = seeded_state().await;
    let token = token_for(&state, ADMIN_EMAIL).await;
    let app = test::init_service(build_app(state)).await;

    let delete = || {
        test::TestRequest::delete()
            .uri("/api/users/4")
            .insert_header(bearer(&token))
            .to_request()
    };

    let resp = test::call_service(&app, delete()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User deleted successfully");

    assert_eq!(test::call_service(&app, delete()).await.status(), StatusCode::NOT_FOUND);
}

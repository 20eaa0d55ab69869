use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::models::dto::HealthResponse;

#[get("/health")]
pub async fn health_check(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let database_up = db.ping().await.is_ok();

    let response = HealthResponse {
        status: if database_up { "ok" } else { "degraded" },
        database: if database_up { "up" } else { "down" },
        time: Utc::now(),
    };

    if database_up {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

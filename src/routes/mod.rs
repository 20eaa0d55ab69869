pub mod auth;
pub mod health;
pub mod products;
pub mod users;

use actix_web::{middleware::from_fn, web};

use crate::middleware::access_control;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(from_fn(access_control))
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(products::product_routes)
            .configure(users::user_routes)
    );
}

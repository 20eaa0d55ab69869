pub mod config;
pub mod db;
pub mod errors;
pub mod fixtures;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    App,
};

pub use state::AppState;

/// Application complète: état partagé + routes /api
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .configure(|cfg| state.configure(cfg))
        .configure(routes::configure_routes)
}

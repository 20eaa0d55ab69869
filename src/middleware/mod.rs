pub mod access;
pub mod auth;

pub use access::access_control;
pub use auth::{AdminClientUser, AdminUser, AuthUser};

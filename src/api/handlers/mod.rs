//! HTTP request handlers.

pub mod auth_handler;
pub mod content_handler;
pub mod generate_handler;
pub mod moderation_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use content_handler::content_routes;
pub use generate_handler::generate_routes;
pub use moderation_handler::moderation_routes;
pub use user_handler::{registration_routes, user_routes};

pub mod auth;
pub mod catchers;
pub mod demo;
pub mod vault;

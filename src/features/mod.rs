pub mod admin;
pub mod auth;
pub mod catalog;
pub mod files;
pub mod users;

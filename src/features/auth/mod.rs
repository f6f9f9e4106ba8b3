pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod session;

pub use services::AuthService;
pub use session::SessionContext;

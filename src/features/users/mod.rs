//! Profile of the signed-in user.
//!
//! Every call forwards the caller's own bearer token to the auth API.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/me` | Current profile |
//! | PUT | `/api/me` | Update personal data |
//! | POST | `/api/me/password` | Change password |
//! | PUT | `/api/me/image` | Set or clear the profile picture |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::ProfileService;

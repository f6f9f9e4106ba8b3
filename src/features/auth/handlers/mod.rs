pub mod auth_handler;

pub use auth_handler::{
    __path_forgot_password, __path_get_session, __path_login, __path_reset_password,
    forgot_password, get_session, login, reset_password,
};

mod auth_api_client;

pub use auth_api_client::{AuthApi, AuthApiClient, UpstreamLogin, UpstreamUser};

pub mod constants;
pub mod image_url;
pub mod test_helpers;
pub mod types;
pub mod validation;

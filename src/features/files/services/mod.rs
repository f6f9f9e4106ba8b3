pub mod file_service;

pub use file_service::{is_profile_key_of, FileService, ImageUpload};

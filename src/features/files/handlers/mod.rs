pub mod file_handler;

pub use file_handler::{
    __path_delete_file, __path_upload_banknote_image, __path_upload_profile_image, delete_file,
    upload_banknote_image, upload_profile_image,
};

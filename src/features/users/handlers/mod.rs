pub mod profile_handler;

pub use profile_handler::{
    __path_change_password, __path_get_profile, __path_update_profile,
    __path_update_profile_image, change_password, get_profile, update_profile,
    update_profile_image,
};

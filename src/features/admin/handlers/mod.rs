pub mod admin_handler;

pub use admin_handler::{
    __path_create_banknote, __path_create_country, __path_delete_banknote, __path_get_statistics,
    __path_list_banknotes, __path_list_features, __path_set_featured, __path_set_sold,
    __path_update_banknote, create_banknote, create_country, delete_banknote, get_statistics,
    list_banknotes, list_features, set_featured, set_sold, update_banknote,
};

pub mod catalog_handler;

pub use catalog_handler::{
    __path_explore, __path_get_banknote, __path_get_price_range, __path_list_continent_countries,
    __path_list_continents, __path_list_countries, __path_list_featured, explore, get_banknote,
    get_price_range, list_continent_countries, list_continents, list_countries, list_featured,
};

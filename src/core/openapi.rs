use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::catalog::{dtos as catalog_dtos, handlers as catalog_handlers, taxonomy};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::modules::catalog_api::{Banknote, Country, CountryRef, FeatureTag, Grade};
use crate::shared::types::Meta;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Catalog (public)
        catalog_handlers::list_countries,
        catalog_handlers::list_continents,
        catalog_handlers::list_continent_countries,
        catalog_handlers::explore,
        catalog_handlers::get_price_range,
        catalog_handlers::list_featured,
        catalog_handlers::get_banknote,
        // Auth
        auth_handlers::login,
        auth_handlers::forgot_password,
        auth_handlers::reset_password,
        auth_handlers::get_session,
        // Users
        users_handlers::get_profile,
        users_handlers::update_profile,
        users_handlers::change_password,
        users_handlers::update_profile_image,
        // Files
        files_handlers::upload_banknote_image,
        files_handlers::upload_profile_image,
        files_handlers::delete_file,
        // Admin
        admin_handlers::create_country,
        admin_handlers::list_banknotes,
        admin_handlers::create_banknote,
        admin_handlers::update_banknote,
        admin_handlers::delete_banknote,
        admin_handlers::set_sold,
        admin_handlers::set_featured,
        admin_handlers::list_features,
        admin_handlers::get_statistics,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Catalog API
            Country,
            CountryRef,
            FeatureTag,
            Grade,
            Banknote,
            // Catalog
            taxonomy::Continent,
            taxonomy::ContinentGroup,
            taxonomy::CountryGroup,
            taxonomy::EnrichedBanknote,
            taxonomy::PriceInterval,
            taxonomy::PriceRange,
            taxonomy::Stage,
            catalog_dtos::CountrySummaryDto,
            catalog_dtos::FilterStateDto,
            catalog_dtos::ExplorerViewDto,
            catalog_dtos::BanknoteDetailDto,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::ForgotPasswordRequestDto,
            auth_dtos::ResetPasswordRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::AuthUserDto,
            auth_dtos::SessionResponseDto,
            // Users
            users_dtos::UserProfileDto,
            users_dtos::UpdateProfileDto,
            users_dtos::ChangePasswordDto,
            users_dtos::UpdateProfileImageDto,
            // Files
            files_dtos::UploadBanknoteImageDto,
            files_dtos::UploadProfileImageDto,
            files_dtos::ImageFace,
            files_dtos::UploadedFileDto,
            files_dtos::DeleteFileDto,
            files_dtos::DeleteFileResponseDto,
            // Admin
            admin_dtos::CreateCountryDto,
            admin_dtos::BanknoteDto,
            admin_dtos::ToggleDto,
            admin_dtos::LabelCountDto,
            admin_dtos::InventoryStatisticsDto,
        )
    ),
    tags(
        (name = "catalog", description = "Public banknote catalog and explorer"),
        (name = "auth", description = "Login, password recovery and session state"),
        (name = "users", description = "Profile of the signed-in user"),
        (name = "files", description = "Banknote and profile image storage"),
        (name = "admin", description = "Catalog and inventory administration"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Numismatica API",
        version = "0.1.0",
        description = "Gateway for the Numismatica banknote catalog",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_bearer_scheme() {
        let mut openapi = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Catalogo".to_string(),
            version: "2.0.0".to_string(),
            description: "Docs".to_string(),
        }
        .modify(&mut openapi);

        assert_eq!(openapi.info.title, "Catalogo");
        for path in [
            "/api/catalog/explore",
            "/api/auth/login",
            "/api/me/image",
            "/api/files",
            "/api/admin/statistics",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = openapi.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}

/// Default page size for the admin banknote listing
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// CATALOG CONSTANTS
// =============================================================================

/// Country name used when a banknote arrives without its country reference
pub const UNKNOWN_COUNTRY_NAME: &str = "Desconocido";

/// Country code used when neither the flag nor the name resolves to a code
pub const UNKNOWN_COUNTRY_CODE: &str = "xx";

/// Grading labels accepted for a banknote's condition
pub const BANKNOTE_GRADES: [&str; 5] = ["Regular", "Aceptable", "Bueno", "Muy bueno", "Excelente"];

// =============================================================================
// IMAGE UPLOAD CONSTANTS
// =============================================================================

/// Maximum accepted image size: 5MB
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Image MIME types accepted for banknote and profile pictures
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

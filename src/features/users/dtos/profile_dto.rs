use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::{validate_password_strength, PHONE_REGEX};

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Profile as stored by the auth API
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserProfileDto {
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellidos: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub ciudad: Option<String>,
    #[serde(default)]
    pub pais: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Public URL of the profile picture
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Storage key of the profile picture
    #[serde(default)]
    pub profile_image_path: Option<String>,
}

/// Request DTO for updating the profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub nombre: String,

    #[validate(length(min = 2, max = 100, message = "Surname must be 2-100 characters"))]
    pub apellidos: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone may only contain digits, spaces, +, -, ( and )"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciudad: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pais: Option<String>,
}

/// Request DTO for changing the password of the current user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_strength")
    )]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Request DTO for setting or clearing the profile picture
///
/// Both fields null removes the picture.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileImageDto {
    #[validate(url(message = "profile_image must be a valid URL"))]
    pub profile_image: Option<String>,
    pub profile_image_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_accepts_numeric_id_and_missing_fields() {
        let profile: UserProfileDto =
            serde_json::from_value(json!({"id": 42, "email": "ana@example.com"})).unwrap();
        assert_eq!(profile.id, "42");
        assert_eq!(profile.nombre, None);
    }

    #[test]
    fn test_update_profile_validation() {
        let dto: UpdateProfileDto = serde_json::from_value(json!({
            "nombre": "A",
            "apellidos": "Pérez",
            "email": "ana@example.com",
            "telefono": "call me"
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nombre"));
        assert!(fields.contains_key("telefono"));
        assert!(!fields.contains_key("apellidos"));
    }

    #[test]
    fn test_change_password_validation() {
        let mismatched: ChangePasswordDto = serde_json::from_value(json!({
            "currentPassword": "old",
            "newPassword": "Billetes.2024",
            "confirmPassword": "Billetes.2025"
        }))
        .unwrap();
        let errors = mismatched.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));

        let weak: ChangePasswordDto = serde_json::from_value(json!({
            "currentPassword": "old",
            "newPassword": "billetes2024",
            "confirmPassword": "billetes2024"
        }))
        .unwrap();
        assert!(weak.validate().unwrap_err().field_errors().contains_key("new_password"));

        let good: ChangePasswordDto = serde_json::from_value(json!({
            "currentPassword": "old",
            "newPassword": "Billetes.2024",
            "confirmPassword": "Billetes.2024"
        }))
        .unwrap();
        assert!(good.validate().is_ok());
    }
}

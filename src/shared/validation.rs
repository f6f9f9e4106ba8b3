use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use validator::ValidationError;

use crate::shared::constants::BANKNOTE_GRADES;

lazy_static! {
    /// Regex for two-letter flag codes (ISO 3166-1 alpha-2, lowercase)
    /// - Valid: "co", "es", "jp"
    /// - Invalid: "CO", "col", "c", "c1"
    pub static ref FLAG_CODE_REGEX: Regex = Regex::new(r"^[a-z]{2}$").unwrap();

    /// Regex for flag references given as an image URL
    pub static ref FLAG_URL_REGEX: Regex = Regex::new(r"^https?://\S+$").unwrap();

    /// Digits, spaces and the usual phone punctuation
    /// - Valid: "+57 (1) 555-0101", ""
    /// - Invalid: "call me"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9+\-\s()]*$").unwrap();
}

/// Characters that count as "special" in a password
const PASSWORD_SPECIALS: &str = "@$!%*?&.";

/// A country's flag reference is either a two-letter code or an image URL.
pub fn validate_flag_reference(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if FLAG_CODE_REGEX.is_match(&value.to_lowercase()) || FLAG_URL_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("flag_reference")
            .with_message("must be a two-letter country code or an image URL".into()))
    }
}

/// Prices travel as text; they must parse as a non-negative decimal.
pub fn validate_price(value: &str) -> Result<(), ValidationError> {
    match Decimal::from_str(value.trim()) {
        Ok(price) if !price.is_sign_negative() => Ok(()),
        _ => Err(ValidationError::new("price")
            .with_message("must be a non-negative decimal number".into())),
    }
}

pub fn validate_grade(value: &str) -> Result<(), ValidationError> {
    if BANKNOTE_GRADES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("grade").with_message(
            format!("must be one of: {}", BANKNOTE_GRADES.join(", ")).into(),
        ))
    }
}

/// A password needs a lowercase letter, an uppercase letter, a digit and one of `@$!%*?&.`.
///
/// Length is checked separately with `length(min = 8)`.
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            format!(
                "must contain lowercase and uppercase letters, a digit and one of {}",
                PASSWORD_SPECIALS
            )
            .into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_code_regex_valid() {
        assert!(FLAG_CODE_REGEX.is_match("co"));
        assert!(FLAG_CODE_REGEX.is_match("es"));
    }

    #[test]
    fn test_flag_code_regex_invalid() {
        assert!(!FLAG_CODE_REGEX.is_match("col"));
        assert!(!FLAG_CODE_REGEX.is_match("c"));
        assert!(!FLAG_CODE_REGEX.is_match("c1"));
        assert!(!FLAG_CODE_REGEX.is_match(""));
    }

    #[test]
    fn test_flag_reference_accepts_code_or_url() {
        assert!(validate_flag_reference("CO").is_ok());
        assert!(validate_flag_reference("https://flagcdn.com/w80/co.png").is_ok());
        assert!(validate_flag_reference("colombia").is_err());
        assert!(validate_flag_reference("").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("50000").is_ok());
        assert!(validate_price("1250.50").is_ok());
        assert!(validate_price("0").is_ok());
        assert!(validate_price("-10").is_err());
        assert!(validate_price("abc").is_err());
        assert!(validate_price("").is_err());
    }

    #[test]
    fn test_validate_grade() {
        assert!(validate_grade("Muy bueno").is_ok());
        assert!(validate_grade("muy bueno").is_err());
        assert!(validate_grade("Perfecto").is_err());
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+57 (1) 555-0101"));
        assert!(PHONE_REGEX.is_match(""));
        assert!(!PHONE_REGEX.is_match("call me"));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Billetes.2024").is_ok());
        assert!(validate_password_strength("billetes.2024").is_err());
        assert!(validate_password_strength("BILLETES.2024").is_err());
        assert!(validate_password_strength("Billetes2024").is_err());
        assert!(validate_password_strength("Billetes.").is_err());
    }
}

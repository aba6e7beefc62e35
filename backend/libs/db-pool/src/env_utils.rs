//! Environment variable parsing utilities
//!
//! Shared by [`crate::DbConfig`] and the cart repository's own settings so
//! that every knob is read the same way.

use std::str::FromStr;

/// Parse an environment variable with a default fallback
///
/// Missing and unparsable values both yield `default`.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse a required environment variable
pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    std::env::var(key)
        .map_err(|_| format!("{} environment variable not set", key))?
        .parse()
        .map_err(|_| format!("Failed to parse environment variable {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_with_default() {
        let result: u32 = parse_env_with_default("CART_NONEXISTENT_VAR", 42);
        assert_eq!(result, 42);

        std::env::set_var("CART_TEST_TIMEOUT", "250");
        let result: u64 = parse_env_with_default("CART_TEST_TIMEOUT", 5000);
        assert_eq!(result, 250);

        std::env::set_var("CART_TEST_TIMEOUT", "soon");
        let result: u64 = parse_env_with_default("CART_TEST_TIMEOUT", 5000);
        assert_eq!(result, 5000);
        std::env::remove_var("CART_TEST_TIMEOUT");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_optional() {
        assert_eq!(parse_env_optional::<u32>("CART_NONEXISTENT_VAR"), None);

        std::env::set_var("CART_TEST_OPT", "123");
        assert_eq!(parse_env_optional::<u32>("CART_TEST_OPT"), Some(123));
        std::env::remove_var("CART_TEST_OPT");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_required() {
        assert!(parse_env_required::<u32>("CART_NONEXISTENT_VAR").is_err());

        std::env::set_var("CART_TEST_REQ", "456");
        assert_eq!(parse_env_required::<u32>("CART_TEST_REQ"), Ok(456));

        std::env::set_var("CART_TEST_REQ", "four");
        assert!(parse_env_required::<u32>("CART_TEST_REQ").is_err());
        std::env::remove_var("CART_TEST_REQ");
    }
}

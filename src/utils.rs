//! Shared helpers: id generation and phone validation

use once_cell::sync::Lazy;
use regex::Regex;

static ID_GENERATOR: Lazy<snowflaked::sync::Generator> =
    Lazy::new(|| snowflaked::sync::Generator::new(1));

/// Chinese mobile numbers: 11 digits, leading 1, second digit 3-9
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());

/// Generate a unique snowflake id, rendered as a decimal string
pub fn next_id() -> String {
    ID_GENERATOR.generate::<u64>().to_string()
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn phone_pattern() {
        assert!(is_valid_phone("13800000000"));
        assert!(is_valid_phone("19912345678"));
        assert!(!is_valid_phone("12800000000"));
        assert!(!is_valid_phone("1380000000"));
        assert!(!is_valid_phone("138000000000"));
        assert!(!is_valid_phone("abc"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| next_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}

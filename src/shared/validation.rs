use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating citizen phone numbers
    /// Digits only, 10 to 15 of them
    /// - Valid: "0501234567", "972501234567"
    /// - Invalid: "050-123-4567", "+972501234567", "12345"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\d{10,15}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("0501234567"));
        assert!(PHONE_REGEX.is_match("972501234567"));
        assert!(PHONE_REGEX.is_match("123456789012345"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("050123456")); // too short
        assert!(!PHONE_REGEX.is_match("1234567890123456")); // too long
        assert!(!PHONE_REGEX.is_match("050-123-4567")); // separators
        assert!(!PHONE_REGEX.is_match("+972501234567")); // plus sign
        assert!(!PHONE_REGEX.is_match("")); // empty
    }
}

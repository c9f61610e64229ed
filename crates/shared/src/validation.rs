use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// `local@domain.tld`: no whitespace or `@` in either part, and a dotted suffix.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for candidate in [
            "",
            "user@",
            "@example.com",
            "user@example",
            "user example@test.com",
            "user@@example.com",
            "user@exa mple.com",
        ] {
            assert!(!is_valid_email(candidate), "{candidate:?} should be rejected");
        }
    }
}

//! Numeric input sanitization

/// Keep only ASCII digits
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_non_digits() {
        assert_eq!(digits_only("12a3-4"), "1234");
        assert_eq!(digits_only("4111 1111 1111 1111"), "4111111111111111");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn test_idempotent() {
        let once = digits_only("+7 (912) 345-67-89");
        assert_eq!(digits_only(&once), once);
    }

    #[test]
    fn test_non_ascii_digits_removed() {
        assert_eq!(digits_only("١٢3"), "3");
    }
}

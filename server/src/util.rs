//! Shared utility functions

/// Characters other than alphanumerics that are allowed in a username.
pub const USERNAME_SEPARATORS: [char; 4] = ['-', '.', '+', '_'];

/// Check that a username contains only alphanumerics and the allowed
/// separator set, and is non-empty.
///
/// # Examples
///
/// ```
/// use twitarr_server::util::is_valid_username;
///
/// assert!(is_valid_username("nellie"));
/// assert!(is_valid_username("sea.monkey_2"));
/// assert!(!is_valid_username("who?me"));
/// ```
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || USERNAME_SEPARATORS.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("nellie"));
        assert!(is_valid_username("Nellie2"));
        assert!(is_valid_username("sea-monkey"));
        assert!(is_valid_username("sea.monkey"));
        assert!(is_valid_username("sea+monkey"));
        assert!(is_valid_username("sea_monkey"));
        assert!(is_valid_username("----"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("sea monkey"));
        assert!(!is_valid_username("who?me"));
        assert!(!is_valid_username("admin!"));
        assert!(!is_valid_username("nellie@boat"));
        assert!(!is_valid_username("nellie#1"));
    }
}

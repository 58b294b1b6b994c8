pub mod http;
#[cfg(test)]
pub mod test;

use once_cell::sync::Lazy;
use regex::Regex;

static KEY_SANITIZE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Canonical storage key for a Discord user id.
///
/// Scheme v2: `discord_user_<id>`, with anything outside `[A-Za-z0-9_-]`
/// replaced by `_` to stay within the config store's key charset. Legacy
/// `user:<id>` keys are neither read nor written.
pub fn storage_key(user_id: &str) -> String {
    format!("discord_user_{}", KEY_SANITIZE_REGEX.replace_all(user_id, "_"))
}

pub fn seconds_to_human_readable(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key("1234567890"), "discord_user_1234567890");
        assert_eq!(storage_key("abc_DEF-123"), "discord_user_abc_DEF-123");

        // Characters outside the key charset are replaced
        assert_eq!(storage_key("user:42"), "discord_user_user_42");
        assert_eq!(storage_key("a b@c"), "discord_user_a_b_c");
        assert_eq!(storage_key(""), "discord_user_");
    }

    #[test]
    fn test_seconds_to_human_readable() {
        assert_eq!(seconds_to_human_readable(0), "0h 0m");
        assert_eq!(seconds_to_human_readable(59), "0h 0m");
        assert_eq!(seconds_to_human_readable(60), "0h 1m");
        assert_eq!(seconds_to_human_readable(3600), "1h 0m");
        assert_eq!(seconds_to_human_readable(11520), "3h 12m");
        assert_eq!(seconds_to_human_readable(86399), "23h 59m");
    }
}
